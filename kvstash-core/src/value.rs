use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An opaque stored payload.
///
/// The store never inspects values; this enum only pins down the shapes a
/// client can send over the JSON transport: scalars, strings, sequences, and
/// string-keyed maps. The tagged serde representation is what the snapshot
/// codec writes to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // Integers that do not fit i64 degrade to float, as they would in
            // any JSON round trip.
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(f)) => Value::Float(f),
                (None, None) => Value::Null,
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => {
                Value::Map(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            // Non-finite floats have no JSON representation.
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_from_json() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(true)), Value::Bool(true));
        assert_eq!(Value::from(json!(123)), Value::Int(123));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!("hello")), Value::String("hello".to_string()));
    }

    #[test]
    fn test_nested_json_round_trip() {
        let original = json!({
            "name": "alice",
            "age": 30,
            "scores": [1, 2.5, null],
            "tags": {"admin": true}
        });

        let value = Value::from(original.clone());
        let back = serde_json::Value::from(value);

        assert_eq!(back, original);
    }

    #[test]
    fn test_large_unsigned_degrades_to_float() {
        let big = json!(u64::MAX);
        match Value::from(big) {
            Value::Float(f) => assert!(f > i64::MAX as f64),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_float_serialises_as_null() {
        let json = serde_json::Value::from(Value::Float(f64::NAN));
        assert_eq!(json, serde_json::Value::Null);
    }

    #[test]
    fn test_convenience_conversions() {
        assert_eq!(Value::from("s"), Value::String("s".to_string()));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(false), Value::Bool(false));
    }
}
