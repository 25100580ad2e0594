use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a [`Store`](crate::Store) and its background tasks.
///
/// # Example
///
/// ```rust
/// use kvstash_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_filename("./cache.snapshot")
///     .with_expiration_interval(Duration::from_millis(500))
///     .with_flush_count(10);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path the flush controller writes snapshots to (default: `./store.snapshot`)
    pub filename: PathBuf,
    /// Snapshot to load as the initial map before the background tasks start.
    /// Construction fails if the file is missing or does not decode.
    pub restore_from: Option<PathBuf>,
    /// Interval between expiration sweeps (default: 1 second)
    pub expiration_interval: Duration,
    /// Interval between timer-driven flushes (default: 2 seconds)
    pub flush_interval: Duration,
    /// Number of update signals that triggers a flush early (default: 5)
    pub flush_count: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("./store.snapshot"),
            restore_from: None,
            expiration_interval: Duration::from_secs(1),
            flush_interval: Duration::from_secs(2),
            flush_count: 5,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the snapshot path the flush controller writes to.
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Loads the map from `filename` at construction time.
    ///
    /// Entries that are already expired when the file is loaded stay in the
    /// map until the first sweep but are never returned to callers.
    pub fn with_restore_from_file(mut self, filename: impl Into<PathBuf>) -> Self {
        self.restore_from = Some(filename.into());
        self
    }

    /// Sets the interval between expiration sweeps.
    ///
    /// This bounds how long expired entries linger in memory; the read path
    /// hides them immediately either way.
    pub fn with_expiration_interval(mut self, interval: Duration) -> Self {
        self.expiration_interval = interval;
        self
    }

    /// Sets the interval between timer-driven flushes.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Sets how many update signals trigger a flush ahead of the timer.
    pub fn with_flush_count(mut self, count: usize) -> Self {
        self.flush_count = count;
        self
    }
}
