//! Snapshot codec: serialises the whole map to a single file and back.
//!
//! The on-disk format is bincode over the serde representation of
//! `HashMap<String, Entry>`. Each file holds exactly one complete map and is
//! overwritten in place on every flush.

use std::collections::HashMap;
use std::path::Path;

use crate::entry::Entry;
use crate::error::StoreError;

pub(crate) type Map = HashMap<String, Entry>;

/// Writes a complete snapshot of `map` to `path`, creating or truncating the
/// file. Callers hold at least a read lock on the map for the duration.
pub(crate) async fn save(path: &Path, map: &Map) -> Result<(), StoreError> {
    let bytes = bincode::serde::encode_to_vec(map, bincode::config::standard())
        .map_err(|source| StoreError::SnapshotEncode { source })?;

    tokio::fs::write(path, &bytes)
        .await
        .map_err(|source| StoreError::SnapshotIo {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}

/// Loads a complete map from `path`.
///
/// Used at construction time only, before the background tasks start.
pub(crate) fn load(path: &Path) -> Result<Map, StoreError> {
    let bytes = std::fs::read(path).map_err(|source| StoreError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;

    let (map, _) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
        .map_err(|source| StoreError::SnapshotDecode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(map)
}
