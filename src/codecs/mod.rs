//! The per-type field codecs and their registry.
//!
//! A codec needs only three operations: a membership query and a symmetric
//! `encode`/`decode` pair over dynamic values. Dispatch happens over the
//! closed [`FieldType`](crate::types::FieldType) tag set through the
//! [`CodecRegistry`]; the array codecs recurse through the same registry,
//! which is passed by shared reference at encode/decode time rather than
//! stored.

mod array_object;
mod array_primitive;
mod boolean;
mod enumeration;
mod nullable;
mod number;
mod registry;
mod string;
mod timestamp;
mod uuid;

pub use array_object::ArrayObjectCodec;
pub use array_primitive::ArrayPrimitiveCodec;
pub use boolean::BooleanCodec;
pub use enumeration::EnumCodec;
pub use nullable::{decode_nullable, encode_nullable};
pub use number::NumberCodec;
pub use registry::CodecRegistry;
pub use string::StringCodec;
pub use timestamp::TimestampCodec;
pub use uuid::UuidCodec;

use crate::error::SajcError;
use crate::types::{FieldType, Value};

/// A per-type value codec.
///
/// `encode` consumes a dense column (no `MISSING`; absence is handled by the
/// nullable wrapper above this layer) and produces a self-contained payload;
/// `decode` inverts it. Both take the registry so array codecs can dispatch
/// to the codecs registered for their element types.
pub trait FieldCodec: Send + Sync {
    /// Membership query: can this codec carry columns of `ty`?
    fn supports(&self, ty: FieldType) -> bool;

    fn encode(&self, values: &[Value], registry: &CodecRegistry) -> Result<Vec<u8>, SajcError>;

    fn decode(&self, bytes: &[u8], registry: &CodecRegistry) -> Result<Vec<Value>, SajcError>;
}
