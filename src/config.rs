//! Compression configuration.
//!
//! The config is created once at the application boundary and handed to the
//! compressor at construction time. It deliberately carries only knobs that
//! cannot change the semantic layer's wire bytes: the profiling heuristics
//! (enum cutoff, dictionary ratio, decimal scale bound) are fixed named
//! constants in their owning modules so that two encoders built from the
//! same batch always agree byte-for-byte.

use serde::{Deserialize, Serialize};

/// Defines the trade-off between compression speed and final buffer size for
/// the columnar post-compression path.
///
/// The profile only selects the zstd level applied to each column buffer in
/// `compress_columnar_zstd`; the standard `compress` output is unaffected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionProfile {
    /// Prioritizes speed over size.
    Fast,

    /// A balance between speed and size. This is the recommended default.
    #[default]
    Balanced,

    /// Prioritizes the smallest possible output at the cost of CPU time.
    HighCompression,
}

impl CompressionProfile {
    /// The zstd level this profile maps to.
    pub fn zstd_level(self) -> i32 {
        match self {
            CompressionProfile::Fast => 1,
            CompressionProfile::Balanced => 3,
            CompressionProfile::HighCompression => 19,
        }
    }
}

/// The unified configuration for a [`crate::SemanticCompressor`].
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub struct CompressorConfig {
    /// The profile guiding the columnar post-compression path.
    #[serde(default)]
    pub profile: CompressionProfile,
}
