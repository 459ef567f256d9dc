//! This module contains the pure, stateless kernels for Zstandard
//! compression and decompression.
//!
//! This is the opaque byte codec applied to each column buffer in the
//! columnar post-compressed container. The semantic layer treats it as a
//! total `compress(bytes) -> bytes` / `decompress(bytes) -> bytes` pair;
//! this module is a safe, panic-free wrapper around the `zstd` crate.

use std::io::Write;

use crate::error::SajcError;

/// Compresses a byte slice, prepending the uncompressed length as a
/// `u64 LE` so decoding can verify the frame.
pub fn encode(input: &[u8], level: i32) -> Result<Vec<u8>, SajcError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut output = Vec::with_capacity(input.len());
    output.extend_from_slice(&(input.len() as u64).to_le_bytes());

    let mut encoder =
        zstd::stream::Encoder::new(&mut output, level).map_err(|e| SajcError::Zstd(e.to_string()))?;
    encoder
        .write_all(input)
        .map_err(|e| SajcError::Zstd(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| SajcError::Zstd(e.to_string()))?;

    Ok(output)
}

/// Decompresses a buffer produced by [`encode`], verifying the recorded
/// uncompressed length.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, SajcError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    if input.len() < 8 {
        return Err(SajcError::Zstd(
            "input stream too short to contain a size header".to_string(),
        ));
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&input[0..8]);
    let uncompressed_len = u64::from_le_bytes(len_bytes) as usize;

    let mut output = Vec::with_capacity(uncompressed_len);
    zstd::stream::copy_decode(&input[8..], &mut output)
        .map_err(|e| SajcError::Zstd(e.to_string()))?;

    if output.len() != uncompressed_len {
        return Err(SajcError::Zstd(format!(
            "decompressed size does not match header: expected {}, got {}",
            uncompressed_len,
            output.len()
        )));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_simple_text() {
        let original = b"hello world, this is a test of zstd compression. hello world.".to_vec();
        let compressed = encode(&original, 3).unwrap();
        let decompressed = decode(&compressed).unwrap();
        assert_eq!(original, decompressed);
    }

    #[test]
    fn test_roundtrip_highly_compressible_data() {
        let original = vec![42u8; 10_000];
        let compressed = encode(&original, 5).unwrap();
        assert!(compressed.len() < original.len());
        let decompressed = decode(&compressed).unwrap();
        assert_eq!(original, decompressed);
    }

    #[test]
    fn test_empty_input_roundtrip() {
        assert!(encode(&[], 3).unwrap().is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_invalid_data() {
        let result = decode(&[1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(SajcError::Zstd(_))));
    }
}
