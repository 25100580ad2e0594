//! # kvstash-api
//!
//! The wire contract shared by the kvstash server and client: the request
//! payload for write operations and the JSend-style response envelope.

use serde::{Deserialize, Serialize};

/// Request body for set and update operations.
///
/// `ttl` is a duration in nanoseconds; the server adds it to the current
/// instant to form the entry's expiration. A zero TTL produces an entry that
/// is already expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub value: serde_json::Value,
    pub ttl: u64,
}

impl Payload {
    pub fn new(value: serde_json::Value, ttl: u64) -> Self {
        Self { value, ttl }
    }
}

/// Outcome marker of an [`Envelope`], following the JSend convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The operation completed; `data` carries the result.
    Success,
    /// The request could not be satisfied (e.g. a missing key); `message`
    /// says why.
    Fail,
    /// The server failed while processing the request.
    Error,
}

/// JSend-style response envelope.
///
/// Successful responses carry a `data` field (possibly `null`); failed ones
/// carry a human-readable `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Builds a success envelope carrying `data`.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            message: None,
        }
    }

    /// Builds a fail envelope carrying `message`.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success(json!(["a", "b"]));
        let serialized = serde_json::to_value(&envelope).unwrap();

        assert_eq!(serialized, json!({"status": "success", "data": ["a", "b"]}));
    }

    #[test]
    fn test_success_envelope_keeps_null_data() {
        let envelope = Envelope::success(json!(null));
        let serialized = serde_json::to_value(&envelope).unwrap();

        assert_eq!(serialized, json!({"status": "success", "data": null}));
    }

    #[test]
    fn test_fail_envelope_shape() {
        let envelope = Envelope::fail("key 'k' not found");
        let serialized = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            serialized,
            json!({"status": "fail", "message": "key 'k' not found"})
        );
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = Envelope::success(json!({"nested": [1, 2, 3]}));
        let text = serde_json::to_string(&envelope).unwrap();
        let back: Envelope = serde_json::from_str(&text).unwrap();

        assert_eq!(back, envelope);
    }

    #[test]
    fn test_payload_deserializes_nanosecond_ttl() {
        let payload: Payload =
            serde_json::from_str(r#"{"value": {"name": "alice"}, "ttl": 5000000000}"#).unwrap();

        assert_eq!(payload.value, json!({"name": "alice"}));
        assert_eq!(payload.ttl, 5_000_000_000);
    }
}
