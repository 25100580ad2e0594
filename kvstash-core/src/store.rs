use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::snapshot;
use crate::value::Value;

/// Capacity of the update-signal channel. Once this many signals are
/// pending, writers block until the flush controller drains the backlog.
const UPDATE_CHANNEL_CAPACITY: usize = 5;

type SharedMap = Arc<RwLock<HashMap<String, Entry>>>;

/// Internal shared state for the store.
struct StoreInner {
    map: SharedMap,
    /// One signal per completed write, consumed by the flush controller.
    updates_tx: mpsc::Sender<()>,
    /// Broadcast shutdown flag observed by both background tasks.
    shutdown_tx: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    flusher: Mutex<Option<JoinHandle<()>>>,
}

/// Thread-safe in-memory key-value store with TTL support and snapshot
/// persistence.
///
/// All entries live in a single map behind a reader-writer lock: `get` and
/// `keys` share the lock, while `set`, `update`, `delete`, and the expiration
/// sweep take it exclusively. The flush controller snapshots the map under a
/// read lock, so every snapshot is a consistent point-in-time view.
///
/// Each store spawns two background tasks: an expiration sweeper that
/// periodically removes expired entries, and a flush controller that writes a
/// snapshot when its timer elapses or after enough writes, and once more on
/// [`stop`](Store::stop).
///
/// The read path hides expired entries on its own; the sweeper only reclaims
/// memory. Cloning the store is cheap and all clones share the same map.
///
/// # Example
///
/// ```rust,no_run
/// use kvstash_core::{Store, StoreConfig, Value};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let store = Store::new();
///
///     store.set("key", Value::from("value"), Duration::from_secs(300)).await;
///     assert!(store.get("key").await.is_ok());
///
///     store.stop().await;
/// }
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Creates a new store with default configuration.
    ///
    /// **Note:** Requires a tokio runtime for the background tasks.
    pub fn new() -> Self {
        Self::start(StoreConfig::default(), HashMap::new())
    }

    /// Creates a new store with custom configuration.
    ///
    /// If the configuration asks to restore from a snapshot file, the file is
    /// loaded before the background tasks start; a missing or undecodable
    /// file fails construction. Entries already expired at load time stay in
    /// the map until the first sweep but are never returned to callers.
    ///
    /// **Note:** Requires a tokio runtime for the background tasks.
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        let initial = match &config.restore_from {
            Some(path) => {
                let map = snapshot::load(path)?;
                info!(
                    entries = map.len(),
                    path = %path.display(),
                    "restored store from snapshot"
                );
                map
            }
            None => HashMap::new(),
        };
        Ok(Self::start(config, initial))
    }

    fn start(config: StoreConfig, initial: HashMap<String, Entry>) -> Self {
        let map: SharedMap = Arc::new(RwLock::new(initial));
        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let sweeper = tokio::spawn(sweeper_task(
            Arc::clone(&map),
            config.expiration_interval,
            shutdown_rx.clone(),
        ));
        let flusher = tokio::spawn(flush_task(
            Arc::clone(&map),
            config.filename,
            config.flush_interval,
            config.flush_count,
            updates_rx,
            shutdown_rx,
        ));

        Self {
            inner: Arc::new(StoreInner {
                map,
                updates_tx,
                shutdown_tx,
                sweeper: Mutex::new(Some(sweeper)),
                flusher: Mutex::new(Some(flusher)),
            }),
        }
    }

    /// Retrieves the value for a key.
    ///
    /// Returns [`StoreError::KeyNotFound`] if the key is absent or its entry
    /// has expired, even if the sweeper has not removed it yet.
    pub async fn get(&self, key: &str) -> Result<Value, StoreError> {
        let map = self.inner.map.read().await;
        match map.get(key) {
            Some(entry) if !entry.is_expired() => Ok(entry.value().clone()),
            _ => Err(StoreError::not_found(key)),
        }
    }

    /// Stores a value under `key` with the given TTL.
    ///
    /// Replaces any existing entry unconditionally. A zero TTL produces an
    /// entry that is already expired and never observable.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Value>, ttl: Duration) {
        let key = key.into();
        debug_assert!(!key.is_empty(), "store keys must be non-empty");

        let entry = Entry::new(value.into(), SystemTime::now() + ttl);
        {
            let mut map = self.inner.map.write().await;
            map.insert(key, entry);
        }
        self.notify_update().await;
    }

    /// Replaces the value and TTL of an existing key.
    ///
    /// Fails with [`StoreError::KeyNotFound`] if the key is absent or
    /// expired. An update signal is emitted either way.
    pub async fn update(
        &self,
        key: &str,
        value: impl Into<Value>,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        debug_assert!(!key.is_empty(), "store keys must be non-empty");

        let entry = Entry::new(value.into(), SystemTime::now() + ttl);
        let result = {
            let mut map = self.inner.map.write().await;
            match map.get(key) {
                Some(existing) if !existing.is_expired() => {
                    map.insert(key.to_string(), entry);
                    Ok(())
                }
                _ => Err(StoreError::not_found(key)),
            }
        };
        self.notify_update().await;
        result
    }

    /// Deletes a key. Removing an absent key is a no-op.
    pub async fn delete(&self, key: &str) {
        {
            let mut map = self.inner.map.write().await;
            map.remove(key);
        }
        self.notify_update().await;
    }

    /// Returns the keys of all non-expired entries, in no particular order.
    pub async fn keys(&self) -> Vec<String> {
        let map = self.inner.map.read().await;
        map.iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Returns the number of entries in the map, including expired entries
    /// the sweeper has not removed yet.
    pub async fn len(&self) -> usize {
        self.inner.map.read().await.len()
    }

    /// Returns `true` if the map holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.inner.map.read().await.is_empty()
    }

    /// Stops the store: signals both background tasks, waits for the flush
    /// controller to write its final snapshot and exit, then waits for the
    /// sweeper.
    ///
    /// After this returns, no background task is running and the last state
    /// of the map has been flushed. The store must not be used afterwards.
    pub async fn stop(&self) {
        let _ = self.inner.shutdown_tx.send(true);

        let flusher = self.inner.flusher.lock().take();
        let sweeper = self.inner.sweeper.lock().take();

        if let Some(handle) = flusher {
            if let Err(err) = handle.await {
                error!(error = %err, "flush controller task failed");
            }
        }
        if let Some(handle) = sweeper {
            if let Err(err) = handle.await {
                error!(error = %err, "expiration sweeper task failed");
            }
        }
        info!("store stopped");
    }

    /// Emits one update signal, blocking briefly if the channel is full.
    async fn notify_update(&self) {
        // The controller only goes away on stop, at which point the final
        // flush already covers the map.
        if self.inner.updates_tx.send(()).await.is_err() {
            warn!("update signal dropped: flush controller is not running");
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        // Backstop for stores dropped without stop(): the tasks hold their
        // own map handle, so the flag is the only way to reach them.
        let _ = self.shutdown_tx.send(true);
    }
}

/// Background task that periodically removes expired entries.
///
/// The read path is authoritative about expiration; this task only reclaims
/// memory, so it exits on shutdown without a final sweep.
async fn sweeper_task(
    map: SharedMap,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; wait a full interval instead.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut map = map.write().await;
                let before = map.len();
                map.retain(|_, entry| !entry.is_expired());
                let removed = before - map.len();
                drop(map);

                if removed > 0 {
                    debug!(removed, "swept expired entries");
                }
            }
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    return;
                }
            }
        }
    }
}

/// Background task that snapshots the map when the flush timer elapses, when
/// enough update signals accumulate, and finally on shutdown.
async fn flush_task(
    map: SharedMap,
    path: PathBuf,
    interval: Duration,
    flush_count: usize,
    mut updates_rx: mpsc::Receiver<()>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    let mut pending: usize = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                flush(&map, &path).await;
                ticker.reset();
                pending = 0;
            }
            Some(()) = updates_rx.recv() => {
                pending += 1;
                if pending >= flush_count {
                    flush(&map, &path).await;
                    ticker.reset();
                    pending = 0;
                }
            }
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    flush(&map, &path).await;
                    return;
                }
            }
        }
    }
}

/// Writes one snapshot under a read lock, so no partial write is ever
/// visible in the file.
async fn flush(map: &SharedMap, path: &Path) {
    let map = map.read().await;
    if let Err(err) = snapshot::save(path, &map).await {
        // The persistence contract is broken; continuing would hide it.
        error!(error = %err, "snapshot flush failed");
        std::process::abort();
    }
    debug!(entries = map.len(), path = %path.display(), "flushed snapshot");
}
