//! This module defines the closed set of logical field types a column can
//! carry, together with their fixed wire codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SajcError;

/// The logical type assigned to a column by the profiler.
///
/// The discriminants are the wire codes written into the schema header and
/// must never be renumbered. `Object` is part of the tag set but never
/// appears in a column schema: nested objects are flattened into dotted keys
/// before columns are built, and reconstructed structurally on decode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    String = 0,
    Number = 1,
    Boolean = 2,
    Timestamp = 3,
    Uuid = 4,
    Enum = 5,
    Object = 6,
    Array = 7,
    ArrayPrimitive = 8,
}

impl FieldType {
    /// The wire code written into the schema header.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Resolves a wire code read from a schema header.
    pub fn from_code(code: u8) -> Result<Self, SajcError> {
        match code {
            0 => Ok(FieldType::String),
            1 => Ok(FieldType::Number),
            2 => Ok(FieldType::Boolean),
            3 => Ok(FieldType::Timestamp),
            4 => Ok(FieldType::Uuid),
            5 => Ok(FieldType::Enum),
            6 => Ok(FieldType::Object),
            7 => Ok(FieldType::Array),
            8 => Ok(FieldType::ArrayPrimitive),
            other => Err(SajcError::UnknownFieldType(other)),
        }
    }
}

/// Provides the canonical string representation for a `FieldType`.
impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
