//! The semantic compressor: the top-level orchestrator.
//!
//! Both compress paths share one prepare phase: fix the column order as the
//! sorted union of top-level keys, backfill `MISSING`, flatten nested
//! objects into dotted keys, pivot into columns, profile each column, and
//! encode it behind the nullable wrapper. Every encoded column is
//! immediately decoded again and compared against its input; this doubles
//! the work but catches profiler/codec mismatches before any bytes are
//! committed, so it is a mandatory correctness gate rather than a debug
//! flag.
//!
//! The engine is synchronous and holds no cross-call state beyond its
//! registry and configuration, so a compressor can serve concurrent
//! read-only callers.

use std::collections::BTreeSet;

use crate::codecs::{decode_nullable, encode_nullable, CodecRegistry};
use crate::columns;
use crate::config::CompressorConfig;
use crate::error::SajcError;
use crate::flatten;
use crate::format::{self, ContainerKind, FieldSchema};
use crate::kernels::zstd;
use crate::profiler;
use crate::types::{Record, Value};

pub struct SemanticCompressor {
    registry: CodecRegistry,
    config: CompressorConfig,
}

impl Default for SemanticCompressor {
    fn default() -> Self {
        SemanticCompressor::new()
    }
}

impl SemanticCompressor {
    /// A compressor with the default codec profile and balanced config.
    pub fn new() -> Self {
        SemanticCompressor::with_registry(CodecRegistry::default_profile(), CompressorConfig::default())
    }

    pub fn with_config(config: CompressorConfig) -> Self {
        SemanticCompressor::with_registry(CodecRegistry::default_profile(), config)
    }

    /// A compressor over a caller-assembled registry. Byte output depends on
    /// registry contents (an absent enum codec falls back to the string
    /// codec), so both sides of a wire must agree on the profile.
    pub fn with_registry(registry: CodecRegistry, config: CompressorConfig) -> Self {
        SemanticCompressor { registry, config }
    }

    //==============================================================================
    // 1. Public API
    //==============================================================================

    /// Compresses a batch into the standard `SAJC` container.
    pub fn compress(&self, records: &[Record]) -> Result<Vec<u8>, SajcError> {
        let encoded = self.prepare(records)?;
        let fields: Vec<FieldSchema> = encoded.iter().map(|(schema, _)| schema.clone()).collect();

        let mut out = format::encode_header(ContainerKind::Standard, &fields)?;
        for (_, buffer) in &encoded {
            out.extend_from_slice(buffer);
        }
        Ok(out)
    }

    /// Compresses a batch into the `SJCB` container, passing every column
    /// buffer through zstd independently.
    pub fn compress_columnar_zstd(&self, records: &[Record]) -> Result<Vec<u8>, SajcError> {
        let level = self.config.profile.zstd_level();
        let mut fields = Vec::new();
        let mut buffers = Vec::new();

        for (schema, buffer) in self.prepare(records)? {
            let compressed = zstd::encode(&buffer, level)?;
            fields.push(FieldSchema {
                byte_length: compressed.len() as u32,
                ..schema
            });
            buffers.push(compressed);
        }

        let mut out = format::encode_header(ContainerKind::ColumnarZstd, &fields)?;
        for buffer in &buffers {
            out.extend_from_slice(buffer);
        }
        Ok(out)
    }

    /// Reconstructs the original batch from either container. Record order
    /// matches the input batch order; keys that were `MISSING` are absent
    /// from the reconstructed records.
    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<Record>, SajcError> {
        let (info, mut pos) = format::decode_header(bytes)?;

        let mut decoded_columns: Vec<(String, Vec<Value>)> = Vec::with_capacity(info.fields.len());
        for field in &info.fields {
            let stored = bytes
                .get(pos..pos + field.byte_length as usize)
                .ok_or(SajcError::Truncated("column payload"))?;
            pos += field.byte_length as usize;

            let buffer = match info.kind {
                ContainerKind::Standard => stored.to_vec(),
                ContainerKind::ColumnarZstd => zstd::decode(stored)?,
            };

            let codec = self.registry.get(field.field_type)?;
            let values = decode_nullable(codec, &buffer, &self.registry)?;
            decoded_columns.push((field.name.clone(), values));
        }

        let row_count = decoded_columns
            .first()
            .map(|(_, values)| values.len())
            .unwrap_or(0);
        for (name, values) in &decoded_columns {
            if values.len() != row_count {
                return Err(SajcError::Internal(format!(
                    "column '{name}' holds {} rows, expected {row_count}",
                    values.len()
                )));
            }
        }

        let mut records = Vec::with_capacity(row_count);
        for row in 0..row_count {
            let mut flat = Record::new();
            for (name, values) in &decoded_columns {
                if !values[row].is_missing() {
                    flat.insert(name.clone(), values[row].clone());
                }
            }
            records.push(flatten::unflatten(&flat));
        }
        Ok(records)
    }

    //==============================================================================
    // 2. Prepare Phase
    //==============================================================================

    /// Pivots, profiles and encodes every column, returning schema entries
    /// paired with their (uncompressed) column buffers.
    fn prepare(&self, records: &[Record]) -> Result<Vec<(FieldSchema, Vec<u8>)>, SajcError> {
        if records.is_empty() {
            return Err(SajcError::EmptyBatch);
        }

        // Sorted union of top-level keys fixes the column order; absent
        // keys become MISSING before flattening so sparsity survives the
        // pivot.
        let key_union: BTreeSet<&String> = records.iter().flat_map(|r| r.keys()).collect();
        let flat_records: Vec<Record> = records
            .iter()
            .map(|record| {
                let mut sparse = Record::new();
                for &key in &key_union {
                    sparse.insert(
                        key.clone(),
                        record.get(key).cloned().unwrap_or(Value::Missing),
                    );
                }
                flatten::flatten(&sparse)
            })
            .collect::<Result<_, _>>()?;

        let columns = columns::pivot(&flat_records);

        let mut encoded = Vec::with_capacity(columns.len());
        for column in &columns {
            let field_type = profiler::profile_column(&column.values);
            let (wire_type, codec) = self.registry.resolve(field_type)?;

            let buffer = encode_nullable(codec, &column.values, &self.registry)?;

            // Mandatory self-check: decode what we just encoded and compare.
            let validation = decode_nullable(codec, &buffer, &self.registry)?;
            if validation != column.values {
                return Err(SajcError::RoundTripFailed {
                    field: column.name.clone(),
                    field_type: wire_type,
                });
            }

            if buffer.len() > u32::MAX as usize {
                return Err(SajcError::UnsupportedValue(format!(
                    "column '{}' encodes to {} bytes, beyond the u32 schema limit",
                    column.name,
                    buffer.len()
                )));
            }

            log::debug!(
                "column '{}' profiled as {wire_type}, {} rows in {} bytes",
                column.name,
                column.values.len(),
                buffer.len()
            );

            encoded.push((
                FieldSchema {
                    name: column.name.clone(),
                    field_type: wire_type,
                    byte_length: buffer.len() as u32,
                },
                buffer,
            ));
        }
        Ok(encoded)
    }
}
