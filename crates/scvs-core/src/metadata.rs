//! # Typed Certificate Metadata — Insertion-Ordered Claims
//!
//! The opaque `metadata` mapping supplied at issuance is part of the
//! cryptographic claim set. This module gives it a well-defined shape: an
//! insertion-ordered mapping of string keys to a small tagged union of
//! values, instead of an untyped JSON blob.
//!
//! ## Key Order Is Part of the Commitment
//!
//! Metadata keys serialize **in insertion order** — no sorting. Two claim
//! sets with the same keys in different order produce different canonical
//! bytes, different digests, and different signatures. This matches the
//! reference system, where the serialization of the metadata object as
//! encountered was signed. Changing to sorted keys would silently invalidate
//! every previously issued signature, so the order-preserving form is the
//! frozen contract. `IndexMap` carries the ordering invariant.
//!
//! ## Value Coercion Rules
//!
//! [`Metadata::from_json`] ingests arbitrary JSON with these rules:
//!
//! 1. `null`, `bool`, `string`, `integer` — pass through unchanged.
//! 2. `float` (non-integer number) — **rejected** with `FloatRejected`.
//!    Floats have no byte-stable cross-language serialization.
//! 3. `object` — values recursed, key order preserved.
//! 4. `array` — elements recursed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CanonicalizationError;

/// A single metadata value: null, bool, integer, string, array, or a nested
/// insertion-ordered mapping.
///
/// Serializes untagged, so metadata round-trips as natural JSON. Floats are
/// unrepresentable by construction — a JSON document containing one fails
/// to deserialize into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer. Non-integer numbers are rejected at ingestion.
    Integer(i64),
    /// JSON string.
    String(String),
    /// JSON array.
    Array(Vec<MetadataValue>),
    /// Nested JSON object, insertion-ordered.
    Map(IndexMap<String, MetadataValue>),
}

/// The certificate metadata mapping: string keys to [`MetadataValue`]s,
/// in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, MetadataValue>);

impl Metadata {
    /// Create an empty metadata mapping.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Ingest a JSON value, applying the coercion rules.
    ///
    /// # Errors
    ///
    /// Returns `NotAnObject` if the top-level value is not a JSON object,
    /// `FloatRejected` if any value (at any depth) is a non-integer number,
    /// and `IntegerOutOfRange` for integers that do not fit in `i64`.
    pub fn from_json(value: Value) -> Result<Self, CanonicalizationError> {
        match value {
            Value::Object(map) => {
                let mut out = IndexMap::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, coerce_value(v)?);
                }
                Ok(Self(out))
            }
            other => Err(CanonicalizationError::NotAnObject(json_type_name(&other))),
        }
    }

    /// Insert a key-value pair, returning the previous value if the key
    /// existed. New keys append at the end of the ordering.
    pub fn insert(&mut self, key: impl Into<String>, value: MetadataValue) -> Option<MetadataValue> {
        self.0.insert(key.into(), value)
    }

    /// Retrieve a value by key.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, MetadataValue>> for Metadata {
    fn from(map: IndexMap<String, MetadataValue>) -> Self {
        Self(map)
    }
}

/// Recursively coerce a JSON value into a [`MetadataValue`].
fn coerce_value(value: Value) -> Result<MetadataValue, CanonicalizationError> {
    match value {
        Value::Null => Ok(MetadataValue::Null),
        Value::Bool(b) => Ok(MetadataValue::Bool(b)),
        Value::String(s) => Ok(MetadataValue::String(s)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(MetadataValue::Integer(i))
            } else if let Some(u) = n.as_u64() {
                Err(CanonicalizationError::IntegerOutOfRange(u))
            } else {
                // Non-integer number. as_f64 on a serde_json Number that is
                // neither i64 nor u64 always yields a value.
                Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                ))
            }
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_value).collect();
            Ok(MetadataValue::Array(coerced?))
        }
        Value::Object(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, coerce_value(v)?);
            }
            Ok(MetadataValue::Map(out))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_preserves_insertion_order() {
        let md = Metadata::from_json(serde_json::json!({
            "degree": "BSc Computer Science",
            "year": 2024,
            "honors": true,
            "gpa": "3.8"
        }))
        .unwrap();
        let keys: Vec<&String> = md.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["degree", "year", "honors", "gpa"]);
    }

    #[test]
    fn test_from_json_rejects_float() {
        let result = Metadata::from_json(serde_json::json!({"gpa": 3.8}));
        match result.unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 3.8),
            other => panic!("expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_from_json_rejects_nested_float() {
        let result = Metadata::from_json(serde_json::json!({
            "grades": [{"course": "algorithms", "score": 91.5}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_rejects_non_object_top_level() {
        assert!(matches!(
            Metadata::from_json(serde_json::json!([1, 2, 3])),
            Err(CanonicalizationError::NotAnObject("array"))
        ));
        assert!(matches!(
            Metadata::from_json(serde_json::json!("string")),
            Err(CanonicalizationError::NotAnObject("string"))
        ));
    }

    #[test]
    fn test_from_json_rejects_oversize_integer() {
        let result = Metadata::from_json(serde_json::json!({"big": u64::MAX}));
        assert!(matches!(
            result,
            Err(CanonicalizationError::IntegerOutOfRange(u64::MAX))
        ));
    }

    #[test]
    fn test_integer_and_negative_integer_accepted() {
        let md = Metadata::from_json(serde_json::json!({"year": 2024, "delta": -3})).unwrap();
        assert_eq!(md.get("year"), Some(&MetadataValue::Integer(2024)));
        assert_eq!(md.get("delta"), Some(&MetadataValue::Integer(-3)));
    }

    #[test]
    fn test_null_and_bool_pass_through() {
        let md = Metadata::from_json(serde_json::json!({"a": null, "b": false})).unwrap();
        assert_eq!(md.get("a"), Some(&MetadataValue::Null));
        assert_eq!(md.get("b"), Some(&MetadataValue::Bool(false)));
    }

    #[test]
    fn test_serialization_is_natural_json() {
        let md = Metadata::from_json(serde_json::json!({
            "degree": "BSc",
            "year": 2024,
            "tags": ["honors", "dean-list"]
        }))
        .unwrap();
        let json = serde_json::to_string(&md).unwrap();
        assert_eq!(json, r#"{"degree":"BSc","year":2024,"tags":["honors","dean-list"]}"#);
    }

    #[test]
    fn test_deserialization_preserves_document_order() {
        let md: Metadata =
            serde_json::from_str(r#"{"z":1,"m":"two","a":true}"#).unwrap();
        let keys: Vec<&String> = md.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "m", "a"]);
    }

    #[test]
    fn test_deserialization_rejects_float() {
        let result: Result<Metadata, _> = serde_json::from_str(r#"{"gpa":3.8}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_appends_at_end() {
        let mut md = Metadata::new();
        md.insert("b", MetadataValue::Integer(2));
        md.insert("a", MetadataValue::Integer(1));
        let keys: Vec<&String> = md.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_metadata() {
        let md = Metadata::from_json(serde_json::json!({})).unwrap();
        assert!(md.is_empty());
        assert_eq!(serde_json::to_string(&md).unwrap(), "{}");
    }
}
