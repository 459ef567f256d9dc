//! Codec for columns of canonical hyphenated UUID strings.
//!
//! Each value is stored as its 16 raw bytes with no self-length; the hyphen
//! positions are fixed by RFC 4122, so decode re-inserts them at offsets
//! 8, 12, 16 and 20. Decoded strings are lowercase.

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::types::{FieldType, Value};

pub struct UuidCodec;

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl FieldCodec for UuidCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::Uuid
    }

    fn encode(&self, values: &[Value], _registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        let mut out = Vec::with_capacity(values.len() * 16);
        for value in values {
            let s = value.as_str().ok_or_else(|| {
                SajcError::UnsupportedValue(format!("uuid column holds non-string {value:?}"))
            })?;
            let hex: Vec<u8> = s.bytes().filter(|&b| b != b'-').collect();
            if hex.len() != 32 {
                return Err(SajcError::UnsupportedValue(format!(
                    "'{s}' is not a canonical hyphenated UUID"
                )));
            }
            for pair in hex.chunks_exact(2) {
                match (hex_val(pair[0]), hex_val(pair[1])) {
                    (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                    _ => {
                        return Err(SajcError::UnsupportedValue(format!(
                            "'{s}' contains non-hex characters"
                        )))
                    }
                }
            }
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        if bytes.len() % 16 != 0 {
            return Err(SajcError::Truncated("uuid bytes"));
        }

        let mut values = Vec::with_capacity(bytes.len() / 16);
        for raw in bytes.chunks_exact(16) {
            let hex: String = raw.iter().map(|b| format!("{b:02x}")).collect();
            let uuid = format!(
                "{}-{}-{}-{}-{}",
                &hex[0..8],
                &hex[8..12],
                &hex[12..16],
                &hex[16..20],
                &hex[20..32]
            );
            values.push(Value::String(uuid));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid_values(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::String(s.to_string())).collect()
    }

    #[test]
    fn test_output_is_sixteen_bytes_per_value() {
        let registry = CodecRegistry::default_profile();
        let values = uuid_values(&[
            "550e8400-e29b-41d4-a716-446655440000",
            "00000000-0000-0000-0000-000000000000",
            "ffffffff-ffff-ffff-ffff-ffffffffffff",
        ]);
        let encoded = UuidCodec.encode(&values, &registry).unwrap();
        assert_eq!(encoded.len(), 16 * values.len());
    }

    #[test]
    fn test_roundtrip() {
        let registry = CodecRegistry::default_profile();
        let values = uuid_values(&[
            "550e8400-e29b-41d4-a716-446655440000",
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
        ]);
        let encoded = UuidCodec.encode(&values, &registry).unwrap();
        let decoded = UuidCodec.decode(&encoded, &registry).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_uppercase_input_decodes_lowercase() {
        let registry = CodecRegistry::default_profile();
        let values = uuid_values(&["6BA7B810-9DAD-11D1-80B4-00C04FD430C8"]);
        let encoded = UuidCodec.encode(&values, &registry).unwrap();
        let decoded = UuidCodec.decode(&encoded, &registry).unwrap();
        assert_eq!(
            decoded,
            uuid_values(&["6ba7b810-9dad-11d1-80b4-00c04fd430c8"])
        );
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let registry = CodecRegistry::default_profile();
        let result = UuidCodec.decode(&[0u8; 15], &registry);
        assert!(matches!(result, Err(SajcError::Truncated(_))));
    }

    #[test]
    fn test_null_is_rejected() {
        let registry = CodecRegistry::default_profile();
        let result = UuidCodec.encode(&[Value::Null], &registry);
        assert!(matches!(result, Err(SajcError::UnsupportedValue(_))));
    }
}
