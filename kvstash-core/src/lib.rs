//! # kvstash-core
//!
//! An in-memory key-value store with per-entry TTL, background expiration,
//! and periodic durable snapshotting.
//!
//! ## Features
//!
//! - Thread-safe storage behind a single reader-writer lock: reads share the
//!   lock, writes and the expiration sweep take it exclusively
//! - Lazy expiration on the read path plus a background sweeper that reclaims
//!   memory
//! - A background flush controller that snapshots the whole map to a file
//!   when a timer elapses or after a configurable number of writes, and once
//!   more on shutdown
//! - Restore-from-snapshot at construction
//! - Opaque [`Value`] payloads: scalars, strings, sequences, and string-keyed
//!   maps, convertible to and from `serde_json::Value`
//!
//! ## Example
//!
//! ```rust,no_run
//! use kvstash_core::{Store, StoreConfig, Value};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kvstash_core::StoreError> {
//!     let config = StoreConfig::default()
//!         .with_filename("./cache.snapshot")
//!         .with_flush_interval(Duration::from_secs(5));
//!     let store = Store::with_config(config)?;
//!
//!     store.set("user:123", Value::from("John Doe"), Duration::from_secs(300)).await;
//!
//!     if let Ok(value) = store.get("user:123").await {
//!         println!("user: {value:?}");
//!     }
//!
//!     // Flushes a final snapshot and joins the background tasks.
//!     store.stop().await;
//!     Ok(())
//! }
//! ```

mod config;
mod entry;
mod error;
mod snapshot;
mod store;
mod value;

pub use config::StoreConfig;
pub use entry::Entry;
pub use error::StoreError;
pub use store::Store;
pub use value::Value;
