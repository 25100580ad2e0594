//! Client configuration options.

use std::time::Duration;

/// Options for configuring the kvstash client.
///
/// # Example
///
/// ```rust
/// use kvstash_client::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new("http://localhost:8080")
///     .with_basic_auth("alice", "s3cret")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The server base URL (e.g. "http://localhost:8080")
    pub url: String,

    /// Optional Basic-auth credentials sent with every request
    pub credentials: Option<(String, String)>,

    /// Per-request timeout (default: 10 seconds)
    pub timeout: Duration,
}

impl ClientOptions {
    /// Create new options for the given server base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Attach Basic-auth credentials to every request.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create options from environment variables.
    ///
    /// Reads:
    /// - `KVSTASH_SERVER_URL` - server base URL (defaults to "http://127.0.0.1:8080")
    /// - `KVSTASH_USERNAME` / `KVSTASH_PASSWORD` - optional credentials
    pub fn from_env() -> Self {
        let url = std::env::var("KVSTASH_SERVER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let credentials = match (
            std::env::var("KVSTASH_USERNAME"),
            std::env::var("KVSTASH_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some((username, password)),
            _ => None,
        };

        Self {
            url,
            credentials,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.url, "http://127.0.0.1:8080");
        assert!(options.credentials.is_none());
        assert_eq!(options.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_chaining() {
        let options = ClientOptions::new("http://example.test:9999")
            .with_basic_auth("alice", "s3cret")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(options.url, "http://example.test:9999");
        assert_eq!(
            options.credentials,
            Some(("alice".to_string(), "s3cret".to_string()))
        );
        assert_eq!(options.timeout, Duration::from_secs(3));
    }
}
