//! The dynamic value sum type the engine operates on.
//!
//! The engine is inherently value-polymorphic: a column may hold strings,
//! numbers, booleans, nulls, sub-arrays or sub-objects. Everything is modeled
//! as a single owned sum type so the flattener, the profiler and the nullable
//! wrapper stay uniform. `Missing` is part of the same sum: it marks a key
//! that was absent from a record, which is semantically distinct from a
//! recorded `null`.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// One row of a batch: a mapping from top-level key to value.
pub type Record = BTreeMap<String, Value>;

/// A dynamically typed value.
///
/// Numbers are IEEE-754 doubles; JSON cannot express non-finite values, so a
/// `Number` is always finite in practice. `Missing` never appears on the
/// JSON side of a conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `true` for a plain object, i.e. a map. Arrays and nulls are not
    /// objects; the flattener relies on this distinction.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Converts a JSON object into a [`Record`]. Returns `None` when the
    /// value is not an object.
    pub fn record_from_json(json: JsonValue) -> Option<Record> {
        match Value::from(json) {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Converts a [`Record`] back into a JSON object.
    pub fn record_to_json(record: Record) -> JsonValue {
        JsonValue::from(Value::Map(record))
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            // JSON numbers are finite by construction; integers beyond 2^53
            // narrow to the nearest representable double.
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Number(n) => {
                // Whole doubles in the i64 range serialize as JSON integers,
                // matching the textual form they most likely arrived in.
                if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
                    JsonValue::Number((n as i64).into())
                } else {
                    serde_json::Number::from_f64(n)
                        .map(JsonValue::Number)
                        .unwrap_or(JsonValue::Null)
                }
            }
            Value::String(s) => JsonValue::String(s),
            Value::Seq(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .into_iter()
                    .filter(|(_, value)| !value.is_missing())
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
            // A stray sentinel outside a map has no JSON spelling.
            Value::Missing => JsonValue::Null,
        }
    }
}
