//! Primitive type registry.
//!
//! This module maps primitive C type names to their wire width and to the
//! names of the little-endian helper routines that encode and decode them.
//! The registry is an explicit value so independent generation runs never
//! share state.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Representation of a primitive's bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarRepr {
    /// Unsigned two's complement integer.
    Unsigned,
    /// Signed two's complement integer.
    Signed,
    /// IEEE 754 floating point.
    Float,
}

impl ScalarRepr {
    /// Returns true if `width` bytes is a valid encoding for this representation.
    #[must_use]
    pub const fn supports_width(&self, width: usize) -> bool {
        match self {
            Self::Unsigned | Self::Signed => matches!(width, 1 | 2 | 4 | 8),
            Self::Float => matches!(width, 4 | 8),
        }
    }
}

/// A registered primitive type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveType {
    /// C type name as it appears in declarations (e.g. `uint32_t`).
    pub name: String,
    /// Encoded width in bytes.
    pub byte_width: usize,
    /// Name of the encode helper routine.
    pub encode_fn: String,
    /// Name of the decode helper routine.
    pub decode_fn: String,
    /// Bit pattern representation.
    pub repr: ScalarRepr,
}

impl PrimitiveType {
    /// Creates a primitive following the `serialize<Type>LE` naming convention.
    ///
    /// `stem` is the capitalized type stem (`Int32`, `Float`, ...). Single
    /// byte types drop the `LE` suffix since byte order does not apply.
    #[must_use]
    pub fn conventional(name: &str, stem: &str, byte_width: usize, repr: ScalarRepr) -> Self {
        let suffix = if byte_width > 1 { "LE" } else { "" };
        Self {
            name: name.to_string(),
            byte_width,
            encode_fn: format!("serialize{stem}{suffix}"),
            decode_fn: format!("deserialize{stem}{suffix}"),
            repr,
        }
    }

    /// Returns the C unsigned integer type with the same width.
    #[must_use]
    pub const fn bits_type(&self) -> &'static str {
        match self.byte_width {
            1 => "uint8_t",
            2 => "uint16_t",
            4 => "uint32_t",
            _ => "uint64_t",
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.byte_width == 0 {
            return Err(RegistryError::ZeroWidth {
                name: self.name.clone(),
            });
        }
        if !self.repr.supports_width(self.byte_width) {
            return Err(RegistryError::UnsupportedWidth {
                name: self.name.clone(),
                width: self.byte_width,
            });
        }
        Ok(())
    }
}

/// Lookup table of primitive types, kept in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PrimitiveType>", into = "Vec<PrimitiveType>")]
pub struct TypeRegistry {
    primitives: Vec<PrimitiveType>,
    index: HashMap<String, usize>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the registry of `<stdint.h>` fixed-width types plus `float` and `double`.
    #[must_use]
    pub fn standard() -> Self {
        use ScalarRepr::{Float, Signed, Unsigned};

        let entries = [
            ("int32_t", "Int32", 4, Signed),
            ("uint32_t", "Uint32", 4, Unsigned),
            ("int16_t", "Int16", 2, Signed),
            ("uint16_t", "Uint16", 2, Unsigned),
            ("float", "Float", 4, Float),
            ("double", "Double", 8, Float),
            ("uint8_t", "Uint8", 1, Unsigned),
            ("int8_t", "Int8", 1, Signed),
            ("int64_t", "Int64", 8, Signed),
            ("uint64_t", "Uint64", 8, Unsigned),
        ];

        let mut registry = Self::new();
        for (name, stem, width, repr) in entries {
            registry.insert(PrimitiveType::conventional(name, stem, width, repr));
        }
        registry
    }

    /// Registers a primitive.
    ///
    /// # Errors
    /// Returns `RegistryError` if the width is invalid or the name is taken.
    pub fn register(&mut self, primitive: PrimitiveType) -> Result<(), RegistryError> {
        primitive.validate()?;
        if self.index.contains_key(&primitive.name) {
            return Err(RegistryError::DuplicatePrimitive {
                name: primitive.name,
            });
        }
        self.insert(primitive);
        Ok(())
    }

    fn insert(&mut self, primitive: PrimitiveType) {
        self.index
            .insert(primitive.name.clone(), self.primitives.len());
        self.primitives.push(primitive);
    }

    /// Looks up a primitive by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PrimitiveType> {
        self.index.get(name).map(|&idx| &self.primitives[idx])
    }

    /// Returns true if `name` is a registered primitive.
    #[must_use]
    pub fn is_primitive(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the byte width of a primitive.
    #[must_use]
    pub fn byte_width(&self, name: &str) -> Option<usize> {
        self.get(name).map(|p| p.byte_width)
    }

    /// Returns the encode routine name of a primitive.
    #[must_use]
    pub fn encode_fn_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.encode_fn.as_str())
    }

    /// Returns the decode routine name of a primitive.
    #[must_use]
    pub fn decode_fn_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.decode_fn.as_str())
    }

    /// Iterates over primitives in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PrimitiveType> {
        self.primitives.iter()
    }

    /// Returns the number of registered primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns true if no primitive is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl TryFrom<Vec<PrimitiveType>> for TypeRegistry {
    type Error = RegistryError;

    fn try_from(primitives: Vec<PrimitiveType>) -> Result<Self, Self::Error> {
        let mut registry = Self::new();
        for primitive in primitives {
            registry.register(primitive)?;
        }
        Ok(registry)
    }
}

impl From<TypeRegistry> for Vec<PrimitiveType> {
    fn from(registry: TypeRegistry) -> Self {
        registry.primitives
    }
}
