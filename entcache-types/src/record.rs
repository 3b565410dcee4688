//! Entity record type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single cached record: arbitrary JSON whose structure is owned by the
/// backend, not the cache.
///
/// Update and delete merges match records on an identifying field (usually
/// `"id"`); records without that field never match anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(Value);

impl EntityRecord {
    /// Wraps a JSON value as a record.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwraps back to the JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a value using a JSON pointer (e.g., "/meta/author").
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// Extracts a string value using a JSON pointer.
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extracts a boolean value using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.0.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extracts a numeric value using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.0.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Returns the record's identifying value for the given field,
    /// or `None` if the field is absent.
    pub fn ident(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Whether this record and `other` carry the same identifying value.
    /// False when either side lacks the field.
    #[must_use]
    pub fn matches_ident(&self, field: &str, other: &EntityRecord) -> bool {
        match (self.ident(field), other.ident(field)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for EntityRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<EntityRecord> for Value {
    fn from(record: EntityRecord) -> Self {
        record.0
    }
}
