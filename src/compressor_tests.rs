//! End-to-end tests for the semantic compressor: both containers, the
//! null-vs-missing distinction, nested structures, and the documented
//! failure modes.

use serde_json::json;

use crate::error::SajcError;
use crate::format::{peek_schema, ContainerKind, FORMAT_VERSION};
use crate::types::{FieldType, Record, Value};
use crate::SemanticCompressor;

fn batch(rows: &[serde_json::Value]) -> Vec<Record> {
    rows.iter()
        .map(|row| Value::record_from_json(row.clone()).expect("test rows are objects"))
        .collect()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rich_batch() -> Vec<Record> {
    batch(&[
        json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-01-01T00:00:00.000Z",
            "status": "active",
            "retries": 0,
            "ratio": 0.25,
            "ok": true,
            "note": null,
            "user": {"name": "ada", "address": {"city": "london"}},
            "tags": ["alpha", "beta"],
            "events": [{"kind": "open", "at": 1}, {"kind": "close", "at": 2}]
        }),
        json!({
            "id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "created_at": "2025-01-01T00:00:00.250Z",
            "status": "idle",
            "retries": 3,
            "ratio": 0.5,
            "ok": false,
            "user": {"name": "lin", "address": {"city": "taipei"}},
            "tags": [],
            "events": [{"kind": "open", "at": 3}]
        }),
        json!({
            "id": "00000000-0000-4000-8000-000000000000",
            "created_at": "2024-12-31T23:59:59.999Z",
            "status": "active",
            "retries": 1,
            "ratio": 0.75,
            "ok": true,
            "note": null,
            "user": {"name": "kim", "address": {"city": "oslo"}},
            "tags": ["gamma"],
            "events": []
        }),
    ])
}

#[test]
fn test_standard_container_roundtrip() {
    init_logging();
    let compressor = SemanticCompressor::new();
    let records = rich_batch();

    let bytes = compressor.compress(&records).unwrap();
    let restored = compressor.decompress(&bytes).unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_columnar_container_roundtrip() {
    init_logging();
    let compressor = SemanticCompressor::new();
    let records = rich_batch();

    let bytes = compressor.compress_columnar_zstd(&records).unwrap();
    let restored = compressor.decompress(&bytes).unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_null_and_missing_stay_distinct() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[json!({"a": 1, "b": null}), json!({"a": 2})]);

    let restored = compressor
        .decompress(&compressor.compress(&records).unwrap())
        .unwrap();

    assert_eq!(restored.len(), 2);
    assert_eq!(restored[0].get("b"), Some(&Value::Null));
    assert!(!restored[1].contains_key("b"), "missing key must not resurface");
    assert_eq!(restored, records);
}

#[test]
fn test_nested_arrays_of_objects() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[
        json!({"xs": [{"k": 1}, {"k": 2}]}),
        json!({"xs": [{"k": 3}]}),
    ]);

    let bytes = compressor.compress(&records).unwrap();
    let info = peek_schema(&bytes).unwrap();
    assert_eq!(info.fields.len(), 1);
    assert_eq!(info.fields[0].field_type, FieldType::Array);

    assert_eq!(compressor.decompress(&bytes).unwrap(), records);
}

#[test]
fn test_column_order_is_sorted_key_union() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[json!({"zeta": 1, "alpha": 2}), json!({"mid": 3})]);

    let bytes = compressor.compress(&records).unwrap();
    let names: Vec<String> = peek_schema(&bytes)
        .unwrap()
        .fields
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_row_order_is_preserved() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[
        json!({"n": 3}),
        json!({"n": 1}),
        json!({"n": 2}),
        json!({"n": 1}),
    ]);
    let restored = compressor
        .decompress(&compressor.compress(&records).unwrap())
        .unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_profiled_types_reach_the_header() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[
        json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "at": "2025-01-01T00:00:00.000Z",
            "state": "on",
            "count": 1,
            "flag": true,
            "free": "anything at all"
        }),
        json!({
            "id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "at": "2025-01-02T00:00:00.000Z",
            "state": "off",
            "count": 2,
            "flag": false,
            "free": "completely different text"
        }),
    ]);

    let info = peek_schema(&compressor.compress(&records).unwrap()).unwrap();
    let type_of = |name: &str| {
        info.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type)
            .unwrap()
    };

    assert_eq!(type_of("id"), FieldType::Uuid);
    assert_eq!(type_of("at"), FieldType::Timestamp);
    assert_eq!(type_of("state"), FieldType::Enum);
    assert_eq!(type_of("count"), FieldType::Number);
    assert_eq!(type_of("flag"), FieldType::Boolean);
    assert_eq!(type_of("free"), FieldType::Enum, "two distinct strings stay under the enum cutoff");
}

#[test]
fn test_flattened_keys_resurface_as_nested_objects() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[
        json!({"user": {"name": "ada", "meta": {"level": 3}}}),
        json!({"user": {"name": "lin"}}),
    ]);

    let bytes = compressor.compress(&records).unwrap();
    let names: Vec<String> = peek_schema(&bytes)
        .unwrap()
        .fields
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["user.meta.level", "user.name"]);

    assert_eq!(compressor.decompress(&bytes).unwrap(), records);
}

#[test]
fn test_heterogeneous_shapes_roundtrip() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[
        json!({"a": {"x": 1}}),
        json!({"a": 7}),
        json!({"b": [1, 2, 3]}),
    ]);
    let restored = compressor
        .decompress(&compressor.compress(&records).unwrap())
        .unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_nulls_ride_string_columns_but_not_numeric_ones() {
    let compressor = SemanticCompressor::new();

    // String and enum payloads are null-aware.
    let stringy = batch(&[json!({"s": "x", "tags": ["a", null]}), json!({"s": null, "tags": []})]);
    let restored = compressor
        .decompress(&compressor.compress(&stringy).unwrap())
        .unwrap();
    assert_eq!(restored, stringy);

    // The number layout has no null channel, so a numeric column holding an
    // explicit null cannot be carried losslessly and is rejected outright.
    let numeric = batch(&[json!({"n": 1}), json!({"n": null})]);
    assert!(matches!(
        compressor.compress(&numeric),
        Err(SajcError::UnsupportedValue(_))
    ));
    let numeric_array = batch(&[json!({"xs": [1, 2, null]})]);
    assert!(matches!(
        compressor.compress(&numeric_array),
        Err(SajcError::UnsupportedValue(_))
    ));
}

#[test]
fn test_null_rows_in_array_columns_are_rejected() {
    let compressor = SemanticCompressor::new();

    // The profiler skips nulls when assigning the array types, but an
    // explicit null row is not a sequence, so the array layouts cannot
    // carry it.
    let primitives = batch(&[json!({"tags": ["a", "b"]}), json!({"tags": null})]);
    assert!(matches!(
        compressor.compress(&primitives),
        Err(SajcError::UnsupportedValue(_))
    ));

    let objects = batch(&[
        json!({"events": [{"kind": "open"}]}),
        json!({"events": null}),
    ]);
    assert!(matches!(
        compressor.compress(&objects),
        Err(SajcError::UnsupportedValue(_))
    ));

    // A missing key is absence, not null: it rides the validity bitmap and
    // the batch survives.
    let sparse = batch(&[json!({"tags": ["a", "b"]}), json!({})]);
    let restored = compressor
        .decompress(&compressor.compress(&sparse).unwrap())
        .unwrap();
    assert_eq!(restored, sparse);
}

#[test]
fn test_ragged_nested_numeric_fields_roundtrip() {
    let compressor = SemanticCompressor::new();
    // "n" and "m" each cover only part of the inner objects; their nested
    // NUMBER columns must survive the absent rows.
    let records = batch(&[
        json!({"items": [{"n": 1}, {"m": 2}]}),
        json!({"items": [{"n": 3, "m": 4}]}),
    ]);
    let restored = compressor
        .decompress(&compressor.compress(&records).unwrap())
        .unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_empty_nested_object_is_rejected() {
    let compressor = SemanticCompressor::new();

    // An empty object has no leaf to pivot into a column; dropping the key
    // silently would lose data, so compression refuses the batch.
    let top_level = batch(&[json!({"a": {}}), json!({"a": {"x": 1}})]);
    assert!(matches!(
        compressor.compress(&top_level),
        Err(SajcError::UnsupportedValue(_))
    ));

    let inside_items = batch(&[json!({"xs": [{"g": {}}]})]);
    assert!(matches!(
        compressor.compress(&inside_items),
        Err(SajcError::UnsupportedValue(_))
    ));
}

#[test]
fn test_empty_batch_is_rejected() {
    let compressor = SemanticCompressor::new();
    assert!(matches!(
        compressor.compress(&[]),
        Err(SajcError::EmptyBatch)
    ));
    assert!(matches!(
        compressor.compress_columnar_zstd(&[]),
        Err(SajcError::EmptyBatch)
    ));
}

#[test]
fn test_invalid_magic_is_rejected() {
    let compressor = SemanticCompressor::new();
    let result = compressor.decompress(b"NOPE\x01\x00\x00");
    assert!(matches!(result, Err(SajcError::InvalidMagic)));
}

#[test]
fn test_truncated_payload_is_rejected() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[json!({"a": 1})]);
    let bytes = compressor.compress(&records).unwrap();
    let result = compressor.decompress(&bytes[..bytes.len() - 1]);
    assert!(matches!(result, Err(SajcError::Truncated(_))));
}

#[test]
fn test_container_kinds_and_version() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[json!({"a": 1})]);

    let standard = peek_schema(&compressor.compress(&records).unwrap()).unwrap();
    assert_eq!(standard.kind, ContainerKind::Standard);
    assert_eq!(standard.version, FORMAT_VERSION);

    let columnar = peek_schema(&compressor.compress_columnar_zstd(&records).unwrap()).unwrap();
    assert_eq!(columnar.kind, ContainerKind::ColumnarZstd);
    assert_eq!(columnar.version, FORMAT_VERSION);
}

#[test]
fn test_columnar_shrinks_repetitive_batches() {
    let compressor = SemanticCompressor::new();
    let rows: Vec<serde_json::Value> = (0..200)
        .map(|i| {
            json!({
                "message": "the quick brown fox jumps over the lazy dog",
                "sequence": i
            })
        })
        .collect();
    let records = batch(&rows);

    let textual: usize = rows.iter().map(|r| r.to_string().len()).sum();
    let standard = compressor.compress(&records).unwrap();
    assert!(
        standard.len() < textual,
        "semantic layer alone beats row-oriented text: {} vs {textual}",
        standard.len()
    );
    assert_eq!(compressor.decompress(&standard).unwrap(), records);
}

#[test]
fn test_all_missing_column_survives() {
    let compressor = SemanticCompressor::new();
    // "b" exists in one record only, as an explicit null.
    let records = batch(&[json!({"a": 1, "b": null}), json!({"a": 2}), json!({"a": 3})]);
    let restored = compressor
        .decompress(&compressor.compress(&records).unwrap())
        .unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_single_record_batch() {
    let compressor = SemanticCompressor::new();
    let records = batch(&[json!({"only": {"deep": {"leaf": "value"}}})]);
    let restored = compressor
        .decompress(&compressor.compress(&records).unwrap())
        .unwrap();
    assert_eq!(restored, records);
}
