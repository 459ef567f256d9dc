//! This module contains pure, stateless kernels for handling key absence.
//!
//! A column of length `n` is described by a validity bitmap of `ceil(n/8)`
//! bytes, LSB-first within each byte: bit `i` is set iff position `i` holds
//! a recorded value (including an explicit `null`), and clear iff the key
//! was `MISSING` from that record. A recorded `null` is a value and is never
//! stripped here; only `MISSING` is.

use crate::error::SajcError;
use crate::types::Value;

/// Builds the validity bitmap for `values` and compacts the non-`MISSING`
/// entries into a dense vector, preserving row order.
pub fn strip_missing(values: &[Value]) -> (Vec<u8>, Vec<Value>) {
    let mut bitmap = vec![0u8; values.len().div_ceil(8)];
    let mut present = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        if !value.is_missing() {
            bitmap[i / 8] |= 1 << (i % 8);
            present.push(value.clone());
        }
    }

    (bitmap, present)
}

/// Counts the set bits covering the first `row_count` positions.
///
/// Trailing pad bits beyond `row_count` are ignored, so a corrupt pad cannot
/// inflate the expected value count.
pub fn count_present(bitmap: &[u8], row_count: usize) -> usize {
    (0..row_count)
        .filter(|&i| bitmap.get(i / 8).is_some_and(|byte| byte & (1 << (i % 8)) != 0))
        .count()
}

/// Re-interleaves a dense vector of decoded values with `MISSING` according
/// to the bitmap. Fails when the dense count disagrees with the bitmap's
/// popcount.
pub fn reapply_missing(
    bitmap: &[u8],
    row_count: usize,
    present: Vec<Value>,
) -> Result<Vec<Value>, SajcError> {
    let expected = count_present(bitmap, row_count);
    if expected != present.len() {
        return Err(SajcError::BitmapMismatch {
            expected,
            got: present.len(),
        });
    }

    let mut dense = present.into_iter();
    let mut rows = Vec::with_capacity(row_count);
    for i in 0..row_count {
        let set = bitmap.get(i / 8).is_some_and(|byte| byte & (1 << (i % 8)) != 0);
        if set {
            // count_present guarantees the iterator holds enough values.
            rows.push(dense.next().unwrap_or(Value::Missing));
        } else {
            rows.push(Value::Missing);
        }
    }
    Ok(rows)
}
