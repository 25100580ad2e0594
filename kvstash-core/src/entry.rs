use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A stored value together with its expiration instant.
///
/// Expiration uses wall-clock time so entries loaded from a snapshot keep
/// their original instants across a process restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    value: Value,
    expires_at: SystemTime,
}

impl Entry {
    /// Creates a new entry with the given value and expiration instant.
    pub fn new(value: Value, expires_at: SystemTime) -> Self {
        Self { value, expires_at }
    }

    /// Returns a reference to the stored value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the expiration instant.
    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// Checks if this entry has expired.
    ///
    /// An entry whose expiration instant equals the current instant counts as
    /// expired, so a zero TTL is never observable.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= SystemTime::now()
    }
}
