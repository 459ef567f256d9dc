//! Codec for columns whose values are arrays of primitives.
//!
//! Layout: `Varint(rowCount) | Varint(len_i) x rowCount |
//! [ u8 innerType | Varint(payloadLen) | payload ]?`. The optional block is
//! absent iff every row is empty. Otherwise the concatenation of all inner
//! elements profiles as one column, dispatches through the registry, and
//! the resulting payload is sliced back into per-row arrays on decode by
//! the recorded lengths.

use std::io::Cursor;

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::kernels::varint;
use crate::profiler;
use crate::types::{FieldType, Value};

pub struct ArrayPrimitiveCodec;

impl FieldCodec for ArrayPrimitiveCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::ArrayPrimitive
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

        let flat: Vec<Value> = rows.iter().flat_map(|row| row.iter().cloned()).collect();
        if flat.is_empty() {
            return Ok(out);
        }

        let mut inner_ty = profiler::profile_column(&flat);
        // A mixed probe can land elsewhere even when every element is
        // numeric; numbers always take the number codec.
        if inner_ty != FieldType::Number && flat.iter().all(|v| v.as_number().is_some()) {
            inner_ty = FieldType::Number;
        }
        let (wire_ty, codec) = registry.resolve(inner_ty)?;

        let payload = codec.encode(&flat, registry)?;
        out.push(wire_ty.code());
        varint::encode_u32(payload.len() as u32, &mut out);
        out.extend_from_slice(&payload);
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

        let pos = cursor.position() as usize;
        let wire_ty = FieldType::from_code(
            *bytes.get(pos).ok_or(SajcError::Truncated("inner type"))?,
        )?;
        cursor.set_position(pos as u64 + 1);

        let payload_len = varint::decode_u32(&mut cursor)? as usize;
        let start = cursor.position() as usize;
        let payload = bytes
            .get(start..start + payload_len)
            .ok_or(SajcError::Truncated("array payload"))?;

        let flat = registry.get(wire_ty)?.decode(payload, registry)?;
        if flat.len() != total {
            return Err(SajcError::Internal(format!(
                "array payload decoded {} elements, row lengths sum to {}",
                flat.len(),
                total
            )));
        }

        let mut elements = flat.into_iter();
        Ok(lengths
            .iter()
            .map(|&len| Value::Seq(elements.by_ref().take(len).collect()))
            .collect())
    }
}
