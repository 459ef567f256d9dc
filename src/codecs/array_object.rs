//! Codec for columns whose values are arrays of objects.
//!
//! The concatenation of all inner objects is flattened and pivoted
//! column-wise, so the layout is a miniature of the top-level container:
//! `Varint(arrayCount) | Varint(len_i) x arrayCount | [ Varint(fieldCount) |
//! ( u8 nameLen | nameBytes | u8 typeCode | Varint(payloadLen) | payload )
//! x fieldCount ]?`. The field block is absent iff there are no inner
//! objects at all.
//!
//! Every nested column rides the same nullable wrapper as a top-level
//! column: a key absent from some inner objects is `MISSING` in that
//! column's validity bitmap and stays absent after reassembly. Ragged item
//! shapes therefore survive for every field type, including the ones whose
//! payloads cannot carry nulls, and a recorded `null` inside an item stays
//! distinct from an absent key wherever the payload is null-aware.

use std::collections::BTreeSet;
use std::io::Cursor;

use crate::codecs::{decode_nullable, encode_nullable, CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::flatten;
use crate::kernels::varint;
use crate::profiler;
use crate::types::{FieldType, Record, Value};

pub struct ArrayObjectCodec;

impl FieldCodec for ArrayObjectCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::Array
    }

    fn encode(&self, values: &[Value], registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        let rows: Vec<&[Value]> = values
            .iter()
            .map(|value| {
                value.as_seq().ok_or_else(|| {
                    SajcError::UnsupportedValue(format!("array column holds non-array {value:?}"))
                })
            })
            .collect::<Result<_, _>>()?;

        let mut out = Vec::new();
        varint::encode_u32(rows.len() as u32, &mut out);
        for row in &rows {
            varint::encode_u32(row.len() as u32, &mut out);
        }

        // Flatten the concatenation of all inner objects.
        let mut items: Vec<Record> = Vec::new();
        for row in &rows {
            for item in row.iter() {
                let entries = item.as_map().ok_or_else(|| {
                    SajcError::UnsupportedValue(format!(
                        "array-of-objects column holds non-object element {item:?}"
                    ))
                })?;
                items.push(flatten::flatten(entries)?);
            }
        }
        if items.is_empty() {
            return Ok(out);
        }

        let key_union: BTreeSet<&String> = items.iter().flat_map(|item| item.keys()).collect();
        varint::encode_u32(key_union.len() as u32, &mut out);

        for key in key_union {
            let column: Vec<Value> = items
                .iter()
                .map(|item| item.get(key).cloned().unwrap_or(Value::Missing))
                .collect();
            let (wire_ty, codec) = registry.resolve(profiler::profile_column(&column))?;
            let payload = encode_nullable(codec, &column, registry)?;

            if key.len() > u8::MAX as usize {
                return Err(SajcError::UnsupportedValue(format!(
                    "nested field name '{key}' exceeds 255 bytes"
                )));
            }
            out.push(key.len() as u8);
            out.extend_from_slice(key.as_bytes());
            out.push(wire_ty.code());
            varint::encode_u32(payload.len() as u32, &mut out);
            out.extend_from_slice(&payload);
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        let mut cursor = Cursor::new(bytes);
        let row_count = varint::decode_u32(&mut cursor)? as usize;

        let mut lengths = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            lengths.push(varint::decode_u32(&mut cursor)? as usize);
        }
        let total: usize = lengths.iter().sum();

        if total == 0 {
            return Ok(lengths.iter().map(|_| Value::Seq(Vec::new())).collect());
        }

        let field_count = varint::decode_u32(&mut cursor)? as usize;
        let mut flat_items: Vec<Record> = vec![Record::new(); total];

        for _ in 0..field_count {
            let pos = cursor.position() as usize;
            let name_len = *bytes.get(pos).ok_or(SajcError::Truncated("nested field name"))? as usize;
            let raw_name = bytes
                .get(pos + 1..pos + 1 + name_len)
                .ok_or(SajcError::Truncated("nested field name"))?;
            let name = std::str::from_utf8(raw_name)
                .map_err(|_| SajcError::UnsupportedValue("non-UTF-8 field name".to_string()))?
                .to_string();
            cursor.set_position((pos + 1 + name_len) as u64);

            let type_pos = cursor.position() as usize;
            let wire_ty = FieldType::from_code(
                *bytes.get(type_pos).ok_or(SajcError::Truncated("nested field type"))?,
            )?;
            cursor.set_position(type_pos as u64 + 1);

            let payload_len = varint::decode_u32(&mut cursor)? as usize;
            let start = cursor.position() as usize;
            let payload = bytes
                .get(start..start + payload_len)
                .ok_or(SajcError::Truncated("nested field payload"))?;
            cursor.set_position((start + payload_len) as u64);

            let column = decode_nullable(registry.get(wire_ty)?, payload, registry)?;
            if column.len() != total {
                return Err(SajcError::Internal(format!(
                    "nested column '{name}' decoded {} values, expected {total}",
                    column.len()
                )));
            }

            // Join on item index; MISSING means the key was not present in
            // that item.
            for (item, value) in flat_items.iter_mut().zip(column) {
                if !value.is_missing() {
                    item.insert(name.clone(), value);
                }
            }
        }

        let mut objects = flat_items
            .into_iter()
            .map(|flat| Value::Map(flatten::unflatten(&flat)));
        Ok(lengths
            .iter()
            .map(|&len| Value::Seq(objects.by_ref().take(len).collect()))
            .collect())
    }
}
