//! Adaptive codec for string columns.
//!
//! The encoder builds an insertion-ordered dictionary over the values
//! (nulls are dictionary entries like any other). Columns that are mostly
//! unique ship raw; low-cardinality columns ship the dictionary plus the
//! smaller of two index streams, a plain varint stream or a run-length
//! stream of `(index, runLength)` pairs. The mode byte at offset 0 names
//! the layout so decoders accept any valid mode regardless of how the
//! encoder chose.

use std::collections::HashMap;
use std::io::Cursor;

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::kernels::varint;
use crate::types::{FieldType, Value};

/// Raw mode wins when at least this share of the values is unique.
pub const DICT_UNIQUENESS_RATIO: f64 = 0.7;

const MODE_RAW: u8 = 0x00;
const MODE_DICT: u8 = 0x01;
const MODE_DICT_RLE: u8 = 0x02;

pub struct StringCodec;

/// A string column entry: a string or a recorded null.
fn entry_of(value: &Value) -> Result<Option<&str>, SajcError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(SajcError::UnsupportedValue(format!(
            "string column holds non-string {other:?}"
        ))),
    }
}

/// Null-aware length-prefixed form: `Varint(0)` for null, else
/// `Varint(byteLen + 1) | utf8Bytes`.
fn write_entry(entry: Option<&str>, out: &mut Vec<u8>) {
    match entry {
        None => varint::encode_u32(0, out),
        Some(s) => {
            varint::encode_u32(s.len() as u32 + 1, out);
            out.extend_from_slice(s.as_bytes());
        }
    }
}

fn read_entry(cursor: &mut Cursor<&[u8]>) -> Result<Value, SajcError> {
    let tag = varint::decode_u32(cursor)? as usize;
    if tag == 0 {
        return Ok(Value::Null);
    }
    let len = tag - 1;
    let start = cursor.position() as usize;
    let raw = cursor
        .get_ref()
        .get(start..start + len)
        .ok_or(SajcError::Truncated("string bytes"))?;
    let s = std::str::from_utf8(raw)
        .map_err(|_| SajcError::UnsupportedValue("non-UTF-8 string payload".to_string()))?
        .to_string();
    cursor.set_position((start + len) as u64);
    Ok(Value::String(s))
}

impl FieldCodec for StringCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::String
    }

    fn encode(&self, values: &[Value], _registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        // Insertion-ordered dictionary; the map holds indices into it.
        let mut unique: Vec<Option<&str>> = Vec::new();
        let mut index_of: HashMap<Option<&str>, u32> = HashMap::new();
        let mut indices: Vec<u32> = Vec::with_capacity(values.len());

        for value in values {
            let entry = entry_of(value)?;
            let index = *index_of.entry(entry).or_insert_with(|| {
                unique.push(entry);
                unique.len() as u32 - 1
            });
            indices.push(index);
        }

        if unique.len() as f64 >= DICT_UNIQUENESS_RATIO * values.len() as f64 {
            let mut out = vec![MODE_RAW];
            for value in values {
                write_entry(entry_of(value)?, &mut out);
            }
            return Ok(out);
        }

        let mut dict_header = Vec::new();
        varint::encode_u32(unique.len() as u32, &mut dict_header);
        for &entry in &unique {
            write_entry(entry, &mut dict_header);
        }

        let mut standard = Vec::new();
        for &index in &indices {
            varint::encode_u32(index, &mut standard);
        }

        let mut rle = Vec::new();
        let mut runs = indices.iter().copied().peekable();
        while let Some(index) = runs.next() {
            let mut run_length: u32 = 1;
            while runs.peek() == Some(&index) {
                runs.next();
                run_length += 1;
            }
            varint::encode_u32(index, &mut rle);
            varint::encode_u32(run_length, &mut rle);
        }

        let (mode, stream) = if rle.len() < standard.len() {
            (MODE_DICT_RLE, rle)
        } else {
            (MODE_DICT, standard)
        };

        let mut out = Vec::with_capacity(1 + dict_header.len() + stream.len());
        out.push(mode);
        out.extend_from_slice(&dict_header);
        out.extend_from_slice(&stream);
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        let mode = *bytes.first().ok_or(SajcError::Truncated("string mode"))?;
        let body = &bytes[1..];
        let mut cursor = Cursor::new(body);

        if mode == MODE_RAW {
            let mut values = Vec::new();
            while (cursor.position() as usize) < body.len() {
                values.push(read_entry(&mut cursor)?);
            }
            return Ok(values);
        }

        if mode != MODE_DICT && mode != MODE_DICT_RLE {
            return Err(SajcError::UnknownMode {
                codec: "string",
                mode,
            });
        }

        let unique_count = varint::decode_u32(&mut cursor)? as usize;
        let mut dictionary = Vec::with_capacity(unique_count);
        for _ in 0..unique_count {
            dictionary.push(read_entry(&mut cursor)?);
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

        let mut values = Vec::new();
        if mode == MODE_DICT {
            while (cursor.position() as usize) < body.len() {
                let index = varint::decode_u32(&mut cursor)? as usize;
                values.push(lookup(index)?);
            }
        } else {
            while (cursor.position() as usize) < body.len() {
                let index = varint::decode_u32(&mut cursor)? as usize;
                let run_length = varint::decode_u32(&mut cursor)? as usize;
                let value = lookup(index)?;
                values.extend(std::iter::repeat_with(|| value.clone()).take(run_length));
            }
        }
        Ok(values)
    }
}
