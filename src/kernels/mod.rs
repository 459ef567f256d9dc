//! Pure, stateless byte-level kernels.
//!
//! Everything in here operates on plain integers and byte buffers, knows
//! nothing about columns or records, and is panic-free. The codecs compose
//! these kernels into per-type encodings.

pub mod varint;
pub mod zstd;
