//! This module defines the single, unified error type for the entire sajc
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

use crate::types::FieldType;

#[derive(Error, Debug)]
pub enum SajcError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("compress called with an empty batch")]
    EmptyBatch,

    #[error("no codec registered for field type {0}")]
    NoCodec(FieldType),

    #[error("per-column round-trip check failed for field '{field}' of type {field_type}")]
    RoundTripFailed { field: String, field_type: FieldType },

    #[error("unsupported value for this operation: {0}")]
    UnsupportedValue(String),

    #[error("internal logic error (this is a bug): {0}")]
    Internal(String),

    // =========================================================================
    // === Wire-Format Errors (Raised while parsing encoded buffers)
    // =========================================================================
    #[error("input buffer truncated while reading {0}")]
    Truncated(&'static str),

    #[error("leading bytes are neither SAJC nor SJCB")]
    InvalidMagic,

    #[error("unknown field type code {0}")]
    UnknownFieldType(u8),

    #[error("unknown mode byte 0x{mode:02X} in {codec} payload")]
    UnknownMode { codec: &'static str, mode: u8 },

    #[error("validity bitmap expects {expected} values but the inner codec decoded {got}")]
    BitmapMismatch { expected: usize, got: usize },

    #[error("dictionary index {index} out of range for a dictionary of {len} entries")]
    DictIndexOutOfRange { index: usize, len: usize },

    // =========================================================================
    // === Low-Level Kernel Errors
    // =========================================================================
    #[error("varint does not terminate within the supported integer range")]
    VarintOverflow,

    #[error("enum dictionary string of {0} bytes exceeds the maximum of 254")]
    EnumStringTooLong(usize),

    #[error("zstd operation failed: {0}")]
    Zstd(String),
}
