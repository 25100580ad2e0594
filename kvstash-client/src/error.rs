//! Error types for the kvstash client.

use thiserror::Error;

/// Errors that can occur when talking to a kvstash server.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a usable response (connection, timeout,
    /// or body-decoding failure).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request's credentials.
    #[error("server rejected credentials")]
    Unauthorized,

    /// The server answered with a non-success envelope; `message` carries
    /// its reason (e.g. `key 'k' not found`).
    #[error("server error: {message}")]
    Api { message: String },

    /// The success envelope did not carry data of the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this error is the server's missing-key answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { message } if message.ends_with("not found"))
    }
}
