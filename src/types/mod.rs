//! The canonical, type-safe representations of data flowing through the
//! pipeline: the logical field type tag and the dynamic value sum type.

mod field_type;
mod value;

pub use field_type::FieldType;
pub use value::{Record, Value};
