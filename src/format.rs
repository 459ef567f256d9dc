//! The on-wire container contract: magic numbers, the schema header, and a
//! cheap header-only peek.
//!
//! Both containers share one header shape; they differ only in the magic
//! and in whether each column buffer passed through the opaque byte codec:
//!
//! ```text
//! offset  size  field
//!  0      4     magic = "SAJC" (standard) or "SJCB" (columnar zstd)
//!  4      1     version (u8)
//!  5      2     fieldCount (u16 LE)
//!  7      *     fieldCount x (u8 nameLen | name | u8 typeCode | u32 LE byteLength)
//!  ...    *     concatenated per-column buffers
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SajcError;
use crate::types::FieldType;

/// Magic for the standard container.
pub const MAGIC_STANDARD: &[u8; 4] = b"SAJC";
/// Magic for the columnar post-compressed container.
pub const MAGIC_COLUMNAR: &[u8; 4] = b"SJCB";
/// The current container format version.
pub const FORMAT_VERSION: u8 = 1;

/// Which of the two containers a buffer holds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Standard,
    ColumnarZstd,
}

/// One schema header entry. Order within the header defines order on the
/// wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    /// Length in bytes of this field's column buffer as stored (after the
    /// opaque byte codec, for the columnar container).
    pub byte_length: u32,
}

/// The parsed header of a container, without its column payloads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub kind: ContainerKind,
    pub version: u8,
    pub fields: Vec<FieldSchema>,
}

/// Serializes the header.
pub(crate) fn encode_header(
    kind: ContainerKind,
    fields: &[FieldSchema],
) -> Result<Vec<u8>, SajcError> {
    if fields.len() > u16::MAX as usize {
        return Err(SajcError::UnsupportedValue(format!(
            "{} fields exceed the u16 header limit",
            fields.len()
        )));
    }

    let magic = match kind {
        ContainerKind::Standard => MAGIC_STANDARD,
        ContainerKind::ColumnarZstd => MAGIC_COLUMNAR,
    };

    let mut out = Vec::new();
    out.extend_from_slice(magic);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&(fields.len() as u16).to_le_bytes());

    for field in fields {
        if field.name.len() > u8::MAX as usize {
            return Err(SajcError::UnsupportedValue(format!(
                "field name '{}' exceeds 255 bytes",
                field.name
            )));
        }
        out.push(field.name.len() as u8);
        out.extend_from_slice(field.name.as_bytes());
        out.push(field.field_type.code());
        out.extend_from_slice(&field.byte_length.to_le_bytes());
    }
    Ok(out)
}

/// Parses the header, returning it and the offset where column payloads
/// begin.
pub(crate) fn decode_header(bytes: &[u8]) -> Result<(ContainerInfo, usize), SajcError> {
    let magic = bytes.get(0..4).ok_or(SajcError::Truncated("magic"))?;
    let kind = if magic == MAGIC_STANDARD {
        ContainerKind::Standard
    } else if magic == MAGIC_COLUMNAR {
        ContainerKind::ColumnarZstd
    } else {
        return Err(SajcError::InvalidMagic);
    };

    let version = *bytes.get(4).ok_or(SajcError::Truncated("version"))?;

    let count_bytes: [u8; 2] = bytes
        .get(5..7)
        .and_then(|b| b.try_into().ok())
        .ok_or(SajcError::Truncated("field count"))?;
    let field_count = u16::from_le_bytes(count_bytes) as usize;

    let mut pos = 7;
    let mut fields = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        let name_len = *bytes.get(pos).ok_or(SajcError::Truncated("field name length"))? as usize;
        pos += 1;
        let raw_name = bytes
            .get(pos..pos + name_len)
            .ok_or(SajcError::Truncated("field name"))?;
        let name = std::str::from_utf8(raw_name)
            .map_err(|_| SajcError::UnsupportedValue("non-UTF-8 field name".to_string()))?
            .to_string();
        pos += name_len;

        let field_type =
            FieldType::from_code(*bytes.get(pos).ok_or(SajcError::Truncated("field type"))?)?;
        pos += 1;

        let len_bytes: [u8; 4] = bytes
            .get(pos..pos + 4)
            .and_then(|b| b.try_into().ok())
            .ok_or(SajcError::Truncated("field byte length"))?;
        pos += 4;

        fields.push(FieldSchema {
            name,
            field_type,
            byte_length: u32::from_le_bytes(len_bytes),
        });
    }

    Ok((
        ContainerInfo {
            kind,
            version,
            fields,
        },
        pos,
    ))
}

/// Parses a container's schema header without touching column payloads.
///
/// Reports the container kind, format version, and per-field name, type and
/// stored byte length.
pub fn peek_schema(bytes: &[u8]) -> Result<ContainerInfo, SajcError> {
    decode_header(bytes).map(|(info, _)| info)
}
