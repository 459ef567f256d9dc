//! The field profiler: infers a logical type tag for a column of values.
//!
//! The rules run in a fixed priority order over the column's non-null
//! values, so the first matching rule wins. The cutoffs are product
//! decisions, not universal truths; they are named constants and must stay
//! fixed for wire reproducibility.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{FieldType, Value};

/// A column whose non-null values are all strings with at most this many
/// distinct values profiles as `Enum`.
pub const ENUM_CARDINALITY_LIMIT: usize = 8;

/// RFC-4122 canonical hyphenated form, case-insensitive.
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID pattern is valid")
});

/// `true` when `s` is a canonical hyphenated UUID.
pub fn is_uuid(s: &str) -> bool {
    UUID_RE.is_match(s)
}

/// `true` when `s` parses as an ISO-8601 / RFC-3339 timestamp.
pub fn is_timestamp(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
}

/// Infers the logical type of a column.
///
/// `MISSING` is filtered upstream by the compressor; nulls are filtered
/// here, since a recorded `null` carries no type information of its own. An
/// empty or all-null column defaults to `String`. The array rules inspect
/// the original sequences, whose elements may themselves contain nulls.
pub fn profile_column(values: &[Value]) -> FieldType {
    let non_null: Vec<&Value> = values
        .iter()
        .filter(|v| !v.is_null() && !v.is_missing())
        .collect();

    if non_null.is_empty() {
        return FieldType::String;
    }

    if non_null.iter().all(|v| v.as_str().is_some_and(is_uuid)) {
        return FieldType::Uuid;
    }

    if non_null
        .iter()
        .all(|v| v.as_str().is_some_and(is_timestamp))
    {
        return FieldType::Timestamp;
    }

    if non_null.iter().all(|v| v.as_str().is_some()) {
        let distinct: std::collections::HashSet<&str> =
            non_null.iter().filter_map(|v| v.as_str()).collect();
        if distinct.len() <= ENUM_CARDINALITY_LIMIT {
            return FieldType::Enum;
        }
        return FieldType::String;
    }

    if non_null.iter().all(|v| v.as_bool().is_some()) {
        return FieldType::Boolean;
    }

    if non_null.iter().all(|v| v.as_number().is_some()) {
        return FieldType::Number;
    }

    if non_null
        .iter()
        .all(|v| v.as_seq().is_some_and(|items| items.iter().all(Value::is_map)))
    {
        return FieldType::Array;
    }

    if non_null
        .iter()
        .all(|v| v.as_seq().is_some_and(|items| items.iter().all(|item| !item.is_map())))
    {
        return FieldType::ArrayPrimitive;
    }

    FieldType::String
}
