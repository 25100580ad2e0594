use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the store.
///
/// [`StoreError::KeyNotFound`] is the only error callers are expected to
/// recover from; its message format is part of the external API contract.
/// The snapshot variants mean the persistence contract is broken: restore
/// surfaces them from construction, and the flush controller treats them as
/// fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is absent or its entry has expired.
    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    /// Reading or writing the snapshot file failed.
    #[error("snapshot file {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the map for a snapshot failed.
    #[error("snapshot encoding failed: {source}")]
    SnapshotEncode {
        #[source]
        source: bincode::error::EncodeError,
    },

    /// The snapshot file exists but does not decode to a map.
    #[error("snapshot file {path} is not decodable: {source}")]
    SnapshotDecode {
        path: PathBuf,
        #[source]
        source: bincode::error::DecodeError,
    },
}

impl StoreError {
    /// Builds the lookup failure for `key`, preserving the exact message
    /// format clients match on.
    pub(crate) fn not_found(key: &str) -> Self {
        StoreError::KeyNotFound { key: key.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_message_format() {
        let err = StoreError::not_found("someKey");
        assert_eq!(err.to_string(), "key 'someKey' not found");
    }
}
