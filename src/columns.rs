//! Pivots a list of flat records into per-key value columns.
//!
//! Columns are rectangular: every column's length equals the batch row
//! count, with `MISSING` backfilled wherever a record lacks the key. Column
//! order is the sorted order of the key union, which fixes the on-wire
//! field order.

use std::collections::BTreeSet;

use crate::types::{Record, Value};

/// A vertical slice of the batch: all values of one flattened key.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// Pivots flat records into columns over the sorted union of their keys.
pub fn pivot(records: &[Record]) -> Vec<Column> {
    let key_union: BTreeSet<&String> = records.iter().flat_map(|r| r.keys()).collect();

    key_union
        .into_iter()
        .map(|key| Column {
            name: key.clone(),
            values: records
                .iter()
                .map(|r| r.get(key).cloned().unwrap_or(Value::Missing))
                .collect(),
        })
        .collect()
}
