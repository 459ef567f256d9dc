//! Bit-packed codec for boolean columns.
//!
//! Layout: `Varint(count) | packedBytes`, where `packedBytes` holds one bit
//! per value, LSB-first within each byte, the same convention as the
//! validity bitmap. Trailing pad bits are zero on encode and ignored on
//! decode.

use std::io::Cursor;

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::kernels::varint;
use crate::types::{FieldType, Value};

pub struct BooleanCodec;

impl FieldCodec for BooleanCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::Boolean
    }

    fn encode(&self, values: &[Value], _registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        let mut out = Vec::with_capacity(1 + values.len() / 8);
        varint::encode_u32(values.len() as u32, &mut out);

        let mut packed = vec![0u8; values.len().div_ceil(8)];
        for (i, value) in values.iter().enumerate() {
            let bit = value.as_bool().ok_or_else(|| {
                SajcError::UnsupportedValue(format!("boolean column holds non-boolean {value:?}"))
            })?;
            if bit {
                packed[i / 8] |= 1 << (i % 8);
            }
        }
        out.extend_from_slice(&packed);
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        let mut cursor = Cursor::new(bytes);
        let count = varint::decode_u32(&mut cursor)? as usize;

        let start = cursor.position() as usize;
        let packed = bytes
            .get(start..start + count.div_ceil(8))
            .ok_or(SajcError::Truncated("boolean bits"))?;

        Ok((0..count)
            .map(|i| Value::Bool(packed[i / 8] & (1 << (i % 8)) != 0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bools(bits: &[bool]) -> Vec<Value> {
        bits.iter().map(|&b| Value::Bool(b)).collect()
    }

    #[test]
    fn test_known_bit_layout() {
        let registry = CodecRegistry::default_profile();
        let values = bools(&[true, false, true, true, false, false, true, false, true]);
        let encoded = BooleanCodec.encode(&values, &registry).unwrap();

        // Varint count 9, then bits 0,2,3,6,8 set LSB-first.
        assert_eq!(encoded, vec![0x09, 0x4D, 0x01]);
    }

    #[test]
    fn test_body_is_ceil_count_over_eight() {
        let registry = CodecRegistry::default_profile();
        for n in 0..=17 {
            let values = bools(&vec![true; n]);
            let encoded = BooleanCodec.encode(&values, &registry).unwrap();
            assert_eq!(encoded.len() - 1, n.div_ceil(8));
        }
    }

    #[test]
    fn test_roundtrip() {
        let registry = CodecRegistry::default_profile();
        let values = bools(&[false, true, true, false, true, false, false, true, false, false]);
        let encoded = BooleanCodec.encode(&values, &registry).unwrap();
        let decoded = BooleanCodec.decode(&encoded, &registry).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_trailing_bits_are_ignored() {
        let registry = CodecRegistry::default_profile();
        // Three values, pad bits forced high.
        let decoded = BooleanCodec.decode(&[0x03, 0xFA], &registry).unwrap();
        assert_eq!(decoded, bools(&[false, true, false]));
    }

    #[test]
    fn test_truncated_body_is_detected() {
        let registry = CodecRegistry::default_profile();
        let result = BooleanCodec.decode(&[0x09, 0x4D], &registry);
        assert!(matches!(result, Err(SajcError::Truncated(_))));
    }

    #[test]
    fn test_null_is_rejected() {
        let registry = CodecRegistry::default_profile();
        let result = BooleanCodec.encode(&[Value::Bool(true), Value::Null], &registry);
        assert!(matches!(result, Err(SajcError::UnsupportedValue(_))));
    }
}
