//! Semantic columnar compression for homogeneous streams of JSON-shaped
//! records.
//!
//! The engine pivots a batch of records into per-key value columns, infers a
//! logical type for each column, and dispatches every column to an adaptive
//! codec (dictionary, run-length, delta, bit-packed, zig-zag varint,
//! fixed-point). The result is a self-describing binary container that
//! losslessly reconstructs the original batch, including the distinction
//! between a recorded `null` and an absent key.
//!
//! The crate is organised the same way top to bottom as the data flows:
//! `kernels` holds the pure byte-level transforms, `null_handling` the
//! validity-bitmap machinery, `codecs` the per-type encoders and their
//! registry, and `compressor` the orchestrator tying a schema header to a
//! sequence of encoded columns.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod codecs;
pub mod config;
pub mod error;
pub mod format;
pub mod kernels;
pub mod types;

mod columns;
mod compressor;
mod flatten;
mod null_handling;
mod profiler;

#[cfg(test)]
mod compressor_tests;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use compressor::SemanticCompressor;
pub use config::{CompressionProfile, CompressorConfig};
pub use error::SajcError;
pub use format::{peek_schema, ContainerInfo, ContainerKind, FieldSchema};
pub use types::{FieldType, Record, Value};
