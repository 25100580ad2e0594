//! # kvstash-client
//!
//! An HTTP client for the kvstash key-value store server.
//!
//! Values are plain `serde_json::Value`s; TTLs are `std::time::Duration`s
//! and travel as nanoseconds on the wire.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kvstash_client::Client;
//! use serde_json::json;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kvstash_client::Error> {
//!     let client = Client::new("http://localhost:8080")?;
//!
//!     client.set("my-key", json!({"n": 1}), Duration::from_secs(300)).await?;
//!
//!     let value = client.get("my-key").await?;
//!     println!("got: {value}");
//!
//!     client.delete("my-key").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## With Authentication
//!
//! ```rust,no_run
//! use kvstash_client::{Client, ClientOptions};
//!
//! # async fn example() -> Result<(), kvstash_client::Error> {
//! let options = ClientOptions::new("http://localhost:8080")
//!     .with_basic_auth("alice", "s3cret");
//! let client = Client::with_options(options)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod options;

pub use error::Error;
pub use options::ClientOptions;

use std::time::{Duration, Instant};

use kvstash_api::{Envelope, Payload, Status};

/// A client for the kvstash HTTP API.
///
/// The client is cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl Client {
    /// Connects to a server with default options.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        Self::with_options(ClientOptions::new(url))
    }

    /// Connects to a server with custom options.
    pub fn with_options(options: ClientOptions) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: options.url.trim_end_matches('/').to_string(),
            credentials: options.credentials,
        })
    }

    /// Retrieves the value stored under `key`.
    ///
    /// A missing or expired key surfaces as an [`Error::Api`] whose
    /// [`is_not_found`](Error::is_not_found) predicate is true.
    pub async fn get(&self, key: &str) -> Result<serde_json::Value, Error> {
        let envelope = self
            .execute(self.http.get(self.key_url(key)))
            .await?;
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }

    /// Stores `value` under `key` with the given TTL, replacing any existing
    /// entry.
    pub async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), Error> {
        let payload = Payload::new(value, ttl_nanos(ttl));
        self.execute(self.http.post(self.key_url(key)).json(&payload))
            .await?;
        Ok(())
    }

    /// Replaces the value and TTL of an existing key.
    pub async fn update(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), Error> {
        let payload = Payload::new(value, ttl_nanos(ttl));
        self.execute(self.http.put(self.key_url(key)).json(&payload))
            .await?;
        Ok(())
    }

    /// Deletes `key`. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        self.execute(self.http.delete(self.key_url(key))).await?;
        Ok(())
    }

    /// Lists the keys of all live entries.
    pub async fn keys(&self) -> Result<Vec<String>, Error> {
        let envelope = self
            .execute(self.http.get(format!("{}/api/v1/keys", self.base_url)))
            .await?;
        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(data)?)
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/api/v1/keys/{key}", self.base_url)
    }

    /// Sends one request and decodes the response envelope, failing on
    /// non-success statuses.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Envelope, Error> {
        let request = match &self.credentials {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        };

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }

        let envelope: Envelope = response.json().await?;
        match envelope.status {
            Status::Success => Ok(envelope),
            Status::Fail | Status::Error => Err(Error::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "unknown server error".to_string()),
            }),
        }
    }
}

fn ttl_nanos(ttl: Duration) -> u64 {
    // Durations beyond ~584 years saturate rather than wrap.
    u64::try_from(ttl.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> Client {
        Client::new(url).unwrap()
    }

    #[test]
    fn test_key_url_joins_base_and_key() {
        let client = client("http://localhost:8080");
        assert_eq!(
            client.key_url("user:1"),
            "http://localhost:8080/api/v1/keys/user:1"
        );
    }

    #[test]
    fn test_key_url_tolerates_trailing_slash() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.key_url("k"), "http://localhost:8080/api/v1/keys/k");
    }

    #[test]
    fn test_ttl_nanos_conversion() {
        assert_eq!(ttl_nanos(Duration::from_secs(1)), 1_000_000_000);
        assert_eq!(ttl_nanos(Duration::ZERO), 0);
        assert_eq!(ttl_nanos(Duration::from_secs(u64::MAX)), u64::MAX);
    }
}
