//! Delta codec for columns of ISO-8601 timestamp strings.
//!
//! Each input parses to integer milliseconds since the epoch; the first
//! value becomes the base, stored as an 8-byte little-endian signed integer,
//! and every value (index 0 included, yielding a one-byte zero) follows as a
//! ZigZag varint of its delta from the base. Re-serialization is always UTC
//! with exactly millisecond precision, so sub-millisecond digits and
//! original offsets are a documented lossy narrowing.

use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::kernels::varint;
use crate::types::{FieldType, Value};

pub struct TimestampCodec;

fn parse_millis(value: &Value) -> Result<i64, SajcError> {
    let s = value.as_str().ok_or_else(|| {
        SajcError::UnsupportedValue(format!("timestamp column holds non-string {value:?}"))
    })?;
    let dt = DateTime::parse_from_rfc3339(s)
        .map_err(|e| SajcError::UnsupportedValue(format!("'{s}' is not a timestamp: {e}")))?;
    Ok(dt.with_timezone(&Utc).timestamp_millis())
}

fn format_millis(millis: i64) -> Result<String, SajcError> {
    let dt = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        SajcError::UnsupportedValue(format!("{millis} ms is outside the representable range"))
    })?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl FieldCodec for TimestampCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::Timestamp
    }

    fn encode(&self, values: &[Value], _registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let millis: Vec<i64> = values.iter().map(parse_millis).collect::<Result<_, _>>()?;
        let base = millis[0];

        let mut out = Vec::with_capacity(8 + millis.len());
        out.extend_from_slice(&base.to_le_bytes());
        for &t in &millis {
            varint::encode_zigzag_i64(t - base, &mut out);
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let base_bytes: [u8; 8] = bytes
            .get(0..8)
            .and_then(|b| b.try_into().ok())
            .ok_or(SajcError::Truncated("timestamp base"))?;
        let base = i64::from_le_bytes(base_bytes);

        let mut cursor = Cursor::new(bytes);
        cursor.set_position(8);

        let mut values = Vec::new();
        while (cursor.position() as usize) < bytes.len() {
            let delta = varint::decode_zigzag_i64(&mut cursor)?;
            values.push(Value::String(format_millis(base + delta)?));
        }
        Ok(values)
    }
}
