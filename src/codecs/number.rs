//! Adaptive three-mode codec for numeric columns.
//!
//! The first byte selects the mode. Integer mode (`0x01`) applies iff every
//! value is a finite integer and stores one ZigZag varint per value. Decimal
//! mode (`0x02`) applies iff some smallest scale in `1..=6` turns every
//! value into an integer within tolerance, and stores the scale byte
//! followed by ZigZag varints of the scaled values. Float mode (`0x00`) is
//! the fallback: one 8-byte little-endian IEEE-754 double per value.
//!
//! Decimal reconstruction divides by `10^scale` and is not bit-exact for
//! every representable double; the round-trip holds up to the detection
//! tolerance. Callers needing bit-exact doubles must ensure at least one
//! non-fixed-point value so float mode wins.

use std::io::Cursor;

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::kernels::varint;
use crate::types::{FieldType, Value};

/// Largest power-of-ten scale the decimal probe tries.
pub const MAX_DECIMAL_SCALE: u8 = 6;

/// Absolute tolerance for the decimal-mode fit test.
pub const DECIMAL_TOLERANCE: f64 = 1e-9;

const MODE_FLOAT: u8 = 0x00;
const MODE_INTEGER: u8 = 0x01;
const MODE_DECIMAL: u8 = 0x02;

pub struct NumberCodec;

fn is_exact_integer(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64
}

/// The smallest scale in `1..=MAX_DECIMAL_SCALE` for which every value is
/// within [`DECIMAL_TOLERANCE`] of an integer, if any.
fn find_decimal_scale(numbers: &[f64]) -> Option<u8> {
    (1..=MAX_DECIMAL_SCALE).find(|&scale| {
        let factor = 10f64.powi(scale as i32);
        numbers.iter().all(|&v| {
            let scaled = v * factor;
            scaled.is_finite()
                && (scaled - scaled.round()).abs() < DECIMAL_TOLERANCE
                && scaled.round() >= i64::MIN as f64
                && scaled.round() <= i64::MAX as f64
        })
    })
}

impl FieldCodec for NumberCodec {
    fn supports(&self, ty: FieldType) -> bool {
        ty == FieldType::Number
    }

    fn encode(&self, values: &[Value], _registry: &CodecRegistry) -> Result<Vec<u8>, SajcError> {
        let numbers: Vec<f64> = values
            .iter()
            .map(|value| {
                value.as_number().ok_or_else(|| {
                    SajcError::UnsupportedValue(format!(
                        "number column holds non-numeric {value:?}"
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        if numbers.iter().all(|&v| is_exact_integer(v)) {
            let mut out = Vec::with_capacity(1 + numbers.len());
            out.push(MODE_INTEGER);
            for &v in &numbers {
                varint::encode_zigzag_i64(v as i64, &mut out);
            }
            return Ok(out);
        }

        if let Some(scale) = find_decimal_scale(&numbers) {
            let factor = 10f64.powi(scale as i32);
            let mut out = Vec::with_capacity(2 + numbers.len());
            out.push(MODE_DECIMAL);
            out.push(scale);
            for &v in &numbers {
                varint::encode_zigzag_i64((v * factor).round() as i64, &mut out);
            }
            return Ok(out);
        }

        let mut out = Vec::with_capacity(1 + numbers.len() * 8);
        out.push(MODE_FLOAT);
        for &v in &numbers {
            out.extend_from_slice(&v.to_le_bytes());
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _registry: &CodecRegistry) -> Result<Vec<Value>, SajcError> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let mode = bytes[0];
        let body = &bytes[1..];

        match mode {
            MODE_INTEGER => {
                let mut cursor = Cursor::new(body);
                let mut values = Vec::new();
                while (cursor.position() as usize) < body.len() {
                    values.push(Value::Number(varint::decode_zigzag_i64(&mut cursor)? as f64));
                }
                Ok(values)
            }
            MODE_DECIMAL => {
                let scale = *body.first().ok_or(SajcError::Truncated("decimal scale"))?;
                let factor = 10f64.powi(scale as i32);
                let rest = &body[1..];
                let mut cursor = Cursor::new(rest);
                let mut values = Vec::new();
                while (cursor.position() as usize) < rest.len() {
                    let scaled = varint::decode_zigzag_i64(&mut cursor)?;
                    values.push(Value::Number(scaled as f64 / factor));
                }
                Ok(values)
            }
            MODE_FLOAT => {
                if body.len() % 8 != 0 {
                    return Err(SajcError::Truncated("float values"));
                }
                Ok(body
                    .chunks_exact(8)
                    .map(|chunk| {
                        let mut raw = [0u8; 8];
                        raw.copy_from_slice(chunk);
                        Value::Number(f64::from_le_bytes(raw))
                    })
                    .collect())
            }
            other => Err(SajcError::UnknownMode {
                codec: "number",
                mode: other,
            }),
        }
    }
}
