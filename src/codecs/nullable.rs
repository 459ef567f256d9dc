//! The nullable wrapper: the sole entry point the compressor uses per
//! column.
//!
//! Encoded layout: `u32 LE rowCount | validity bitmap | inner payload`. The
//! bitmap covers `ceil(rowCount/8)` bytes, LSB-first, bit set iff the
//! position holds a recorded value; the inner codec sees only the compacted
//! non-`MISSING` values in row order.

use crate::codecs::{CodecRegistry, FieldCodec};
use crate::error::SajcError;
use crate::null_handling::bitmap;
use crate::types::Value;

/// Wraps `inner` to carry a column that may contain `MISSING`.
pub fn encode_nullable(
    inner: &dyn FieldCodec,
    values: &[Value],
    registry: &CodecRegistry,
) -> Result<Vec<u8>, SajcError> {
    let (validity, present) = bitmap::strip_missing(values);

    let mut out = Vec::with_capacity(4 + validity.len());
    out.extend_from_slice(&(values.len() as u32).to_le_bytes());
    out.extend_from_slice(&validity);
    out.extend_from_slice(&inner.encode(&present, registry)?);
    Ok(out)
}

/// Inverts [`encode_nullable`]: reads the row count and bitmap, decodes the
/// inner payload, and re-interleaves `MISSING`.
///
/// Fails with `BitmapMismatch` when the inner codec decodes a different
/// number of values than the bitmap's popcount.
pub fn decode_nullable(
    inner: &dyn FieldCodec,
    bytes: &[u8],
    registry: &CodecRegistry,
) -> Result<Vec<Value>, SajcError> {
    let mut count_bytes = [0u8; 4];
    let header = bytes
        .get(0..4)
        .ok_or(SajcError::Truncated("column row count"))?;
    count_bytes.copy_from_slice(header);
    let row_count = u32::from_le_bytes(count_bytes) as usize;

    let bitmap_len = row_count.div_ceil(8);
    let validity = bytes
        .get(4..4 + bitmap_len)
        .ok_or(SajcError::Truncated("validity bitmap"))?;

    let present = inner.decode(&bytes[4 + bitmap_len..], registry)?;

    let expected = bitmap::count_present(validity, row_count);
    if expected != present.len() {
        return Err(SajcError::BitmapMismatch {
            expected,
            got: present.len(),
        });
    }

    bitmap::reapply_missing(validity, row_count, present)
}
