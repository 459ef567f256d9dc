//! Conversion between nested plain objects and flat dotted-key maps.
//!
//! The flattener walks a record depth-first and rewrites every nested plain
//! object as `parent.child` entries. Arrays are opaque leaves: the array
//! codecs handle their own recursion. `MISSING` passes through `flatten` as
//! a leaf and is dropped by `unflatten`, so a missing leaf produces no key
//! in the reconstructed object while an explicit `null` does.
//!
//! An empty nested object has no leaf to carry it through the pivot, so it
//! cannot be represented columnarly; `flatten` rejects it with a typed
//! error rather than letting the key vanish without a trace.

use std::collections::BTreeMap;

use crate::error::SajcError;
use crate::types::{Record, Value};

/// Flattens nested plain objects into a single map with dotted keys.
///
/// Fails on empty nested objects, which have no flattened spelling.
pub fn flatten(record: &Record) -> Result<Record, SajcError> {
    let mut flat = Record::new();
    for (key, value) in record {
        flatten_into(key, value, &mut flat)?;
    }
    Ok(flat)
}

fn flatten_into(path: &str, value: &Value, flat: &mut Record) -> Result<(), SajcError> {
    match value {
        Value::Map(entries) if entries.is_empty() => Err(SajcError::UnsupportedValue(format!(
            "empty object at '{path}' has no flattened representation"
        ))),
        Value::Map(entries) => {
            for (key, child) in entries {
                flatten_into(&format!("{path}.{key}"), child, flat)?;
            }
            Ok(())
        }
        other => {
            flat.insert(path.to_string(), other.clone());
            Ok(())
        }
    }
}

/// Rebuilds nested objects from dotted keys. `MISSING` entries are dropped.
pub fn unflatten(flat: &Record) -> Record {
    let mut record = Record::new();
    for (path, value) in flat {
        if value.is_missing() {
            continue;
        }
        insert_path(&mut record, path, value.clone());
    }
    record
}

fn insert_path(record: &mut BTreeMap<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            record.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = record
                .entry(head.to_string())
                .or_insert_with(|| Value::Map(BTreeMap::new()));
            // A scalar already stored under this prefix loses to the nested
            // object; flatten output never produces such a conflict.
            if !child.is_map() {
                *child = Value::Map(BTreeMap::new());
            }
            if let Value::Map(entries) = child {
                insert_path(entries, rest, value);
            }
        }
    }
}
