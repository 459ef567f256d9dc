//! Dictionary codec for low-cardinality string columns.
//!
//! Layout: `u32 LE count | u8 uniqueCount | dictionaryEntries | indices`.
//! Each dictionary entry is either the single byte `0xFF` (a recorded null)
//! or `u8 len | len UTF-8 bytes` with `len < 255`. Indices are one byte per
//! value, unless the dictionary holds at most 16 entries, in which case they
//! pack as 4-bit nibbles, two per byte, high nibble first.

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::types::{FieldType, Value};

const NULL_MARKER: u8 = 0xFF;

/// Dictionaries at or below this size use nibble-packed indices.
pub const NIBBLE_PACK_LIMIT: usize = 16;

pub struct EnumCodec;

fn entry_of(value: &Value) -> Result<Option<&str>, SajcError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(SajcError::UnsupportedValue(format!(
            "enum column holds non-string {other:?}"
        ))),
    }
}

impl FieldCodec for EnumCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::Enum
    }

    fn encode(&self, values: &[Value], _registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        let mut unique: Vec<Option<&str>> = Vec::new();
        let mut indices: Vec<u8> = Vec::with_capacity(values.len());

        for value in values {
            let entry = entry_of(value)?;
            let index = match unique.iter().position(|&u| u == entry) {
                Some(i) => i,
                None => {
                    unique.push(entry);
                    unique.len() - 1
                }
            };
            if index >= u8::MAX as usize {
                return Err(SajcError::UnsupportedValue(
                    "enum cardinality exceeds 255".to_string(),
                ));
            }
            indices.push(index as u8);
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(values.len() as u32).to_le_bytes());
        out.push(unique.len() as u8);

        for &entry in &unique {
            match entry {
                None => out.push(NULL_MARKER),
                Some(s) => {
                    if s.len() >= NULL_MARKER as usize {
                        return Err(SajcError::EnumStringTooLong(s.len()));
                    }
                    out.push(s.len() as u8);
                    out.extend_from_slice(s.as_bytes());
                }
            }
        }

        if unique.len() > NIBBLE_PACK_LIMIT {
            out.extend_from_slice(&indices);
        } else {
            for pair in indices.chunks(2) {
                let hi = pair[0] << 4;
                let lo = pair.get(1).copied().unwrap_or(0);
                out.push(hi | lo);
            }
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        let count_bytes: [u8; 4] = bytes
            .get(0..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(SajcError::Truncated("enum count"))?;
        let count = u32::from_le_bytes(count_bytes) as usize;

        let unique_count = *bytes.get(4).ok_or(SajcError::Truncated("enum dictionary size"))? as usize;

        let mut pos = 5;
        let mut dictionary: Vec<Value> = Vec::with_capacity(unique_count);
        for _ in 0..unique_count {
            let tag = *bytes.get(pos).ok_or(SajcError::Truncated("enum dictionary entry"))?;
            pos += 1;
            if tag == NULL_MARKER {
                dictionary.push(Value::Null);
            } else {
                let len = tag as usize;
                let raw = bytes
                    .get(pos..pos + len)
                    .ok_or(SajcError::Truncated("enum dictionary string"))?;
                let s = std::str::from_utf8(raw)
                    .map_err(|_| SajcError::UnsupportedValue("non-UTF-8 enum entry".to_string()))?;
                dictionary.push(Value::String(s.to_string()));
                pos += len;
            }
        }

        let lookup = |index: usize| -> Result<Value, SajcError> {
            dictionary
                .get(index)
                .cloned()
                .ok_or(SajcError::DictIndexOutOfRange {
                    index,
                    len: dictionary.len(),
                })
        };

        let mut values = Vec::with_capacity(count);
        if unique_count > NIBBLE_PACK_LIMIT {
            let indices = bytes
                .get(pos..pos + count)
                .ok_or(SajcError::Truncated("enum indices"))?;
            for &index in indices {
                values.push(lookup(index as usize)?);
            }
        } else {
            let packed = bytes
                .get(pos..pos + count.div_ceil(2))
                .ok_or(SajcError::Truncated("enum indices"))?;
            for i in 0..count {
                let byte = packed[i / 2];
                let index = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                values.push(lookup(index as usize)?);
            }
        }
        Ok(values)
    }
}
