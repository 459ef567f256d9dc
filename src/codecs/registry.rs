//! Maps logical field types to codec instances.

use std::collections::HashMap;

use crate::codecs::{
    ArrayObjectCodec, ArrayPrimitiveCodec, BooleanCodec, EnumCodec, FieldCodec, NumberCodec,
    StringCodec, TimestampCodec, UuidCodec,
};
use crate::error::SajcError;
use crate::types::FieldType;

/// The codec registry: one codec instance per logical type.
///
/// Registration is expected to happen during construction; lookups are
/// read-only afterwards, so a finished registry can be shared across
/// threads.
pub struct CodecRegistry {
    codecs: HashMap<FieldType, Box<dyn FieldCodec>>,
}

impl CodecRegistry {
    /// An empty registry. Useful for callers composing a custom profile.
    pub fn empty() -> Self {
        CodecRegistry {
            codecs: HashMap::new(),
        }
    }

    /// The default profile: every codec this crate ships is registered.
    pub fn default_profile() -> Self {
        let mut registry = CodecRegistry::empty();
        registry.register(FieldType::String, Box::new(StringCodec));
        registry.register(FieldType::Number, Box::new(NumberCodec));
        registry.register(FieldType::Boolean, Box::new(BooleanCodec));
        registry.register(FieldType::Timestamp, Box::new(TimestampCodec));
        registry.register(FieldType::Uuid, Box::new(UuidCodec));
        registry.register(FieldType::Enum, Box::new(EnumCodec));
        registry.register(FieldType::Array, Box::new(ArrayObjectCodec));
        registry.register(FieldType::ArrayPrimitive, Box::new(ArrayPrimitiveCodec));
        registry
    }

    /// Registers `codec` for `ty`, overwriting (with a warning) any codec
    /// already registered for that type.
    pub fn register(&mut self, ty: FieldType, codec: Box<dyn FieldCodec>) {
        if self.codecs.insert(ty, codec).is_some() {
            log::warn!("overwriting previously registered codec for {ty}");
        }
    }

    /// Looks up the codec for `ty`.
    pub fn get(&self, ty: FieldType) -> Result<&dyn FieldCodec, SajcError> {
        self.codecs
            .get(&ty)
            .map(|codec| codec.as_ref())
            .ok_or(SajcError::NoCodec(ty))
    }

    /// Membership query.
    pub fn supports(&self, ty: FieldType) -> bool {
        self.codecs.contains_key(&ty)
    }

    /// Resolves the codec actually used for a profiled type.
    ///
    /// `Enum` falls back to the `String` codec when no enum codec is
    /// registered, so byte output depends on registry contents exactly as
    /// far as that substitution. The returned type is the one to record on
    /// the wire, so decode dispatches to the same codec.
    pub fn resolve(&self, ty: FieldType) -> Result<(FieldType, &dyn FieldCodec), SajcError> {
        if ty == FieldType::Enum && !self.supports(FieldType::Enum) {
            return Ok((FieldType::String, self.get(FieldType::String)?));
        }
        Ok((ty, self.get(ty)?))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        CodecRegistry::default_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_supports_all_column_types() {
        let registry = CodecRegistry::default_profile();
        for ty in [
            FieldType::String,
            FieldType::Number,
            FieldType::Boolean,
            FieldType::Timestamp,
            FieldType::Uuid,
            FieldType::Enum,
            FieldType::Array,
            FieldType::ArrayPrimitive,
        ] {
            assert!(registry.supports(ty), "missing codec for {ty}");
        }
        assert!(!registry.supports(FieldType::Object));
    }

    #[test]
    fn test_get_on_empty_registry_fails() {
        let registry = CodecRegistry::empty();
        assert!(matches!(
            registry.get(FieldType::Number),
            Err(SajcError::NoCodec(FieldType::Number))
        ));
    }

    #[test]
    fn test_enum_falls_back_to_string() {
        let mut registry = CodecRegistry::empty();
        registry.register(FieldType::String, Box::new(StringCodec));
        let (ty, _) = registry.resolve(FieldType::Enum).unwrap();
        assert_eq!(ty, FieldType::String);

        let full = CodecRegistry::default_profile();
        let (ty, _) = full.resolve(FieldType::Enum).unwrap();
        assert_eq!(ty, FieldType::Enum);
    }
}
