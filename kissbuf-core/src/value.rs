//! Dynamic values for the reference codec.
//!
//! A [`Value`] is the in-process stand-in for a populated C structure:
//! either a scalar or a record of named fields in declaration order.

use crate::error::{Error, Result};
use crate::types::ScalarRepr;

/// A scalar field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Unsigned integer.
    Unsigned(u64),
    /// Signed integer.
    Signed(i64),
    /// Floating point. `float` fields are narrowed to `f32` on encode.
    Float(f64),
}

impl Scalar {
    /// Interprets a little-endian bit pattern of `width` bytes.
    #[must_use]
    pub fn from_bits(bits: u64, repr: ScalarRepr, width: usize) -> Self {
        match repr {
            ScalarRepr::Unsigned => Self::Unsigned(bits),
            ScalarRepr::Signed => {
                let shift = 64 - (width as u32) * 8;
                Self::Signed(((bits << shift) as i64) >> shift)
            }
            ScalarRepr::Float if width == 4 => Self::Float(f64::from(f32::from_bits(bits as u32))),
            ScalarRepr::Float => Self::Float(f64::from_bits(bits)),
        }
    }

    /// Converts the scalar to the bit pattern of a `width`-byte field.
    ///
    /// # Errors
    /// Returns `TypeMismatch` if the scalar kind differs from `repr`, and
    /// `ValueOutOfRange` if an integer does not fit in `width` bytes.
    pub fn to_bits(&self, field: &str, repr: ScalarRepr, width: usize) -> Result<u64> {
        let bits = (width as u32) * 8;
        let out_of_range = || Error::ValueOutOfRange {
            field: field.to_string(),
            width,
        };

        match (self, repr) {
            (Self::Unsigned(v), ScalarRepr::Unsigned) => {
                if bits < 64 && *v >> bits != 0 {
                    return Err(out_of_range());
                }
                Ok(*v)
            }
            (Self::Signed(v), ScalarRepr::Signed) => {
                if bits < 64 {
                    let min = -(1i64 << (bits - 1));
                    let max = (1i64 << (bits - 1)) - 1;
                    if *v < min || *v > max {
                        return Err(out_of_range());
                    }
                    Ok((*v as u64) & ((1u64 << bits) - 1))
                } else {
                    Ok(*v as u64)
                }
            }
            (Self::Float(v), ScalarRepr::Float) if width == 4 => Ok(u64::from((*v as f32).to_bits())),
            (Self::Float(v), ScalarRepr::Float) => Ok(v.to_bits()),
            _ => Err(Error::TypeMismatch {
                field: field.to_string(),
                expected: format!("{repr:?} scalar"),
            }),
        }
    }
}

/// A populated value of a primitive or aggregate type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scalar value of a primitive field.
    Scalar(Scalar),
    /// Aggregate value, fields in declaration order.
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Creates a record from `(name, value)` pairs.
    #[must_use]
    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Shorthand for an unsigned scalar.
    #[must_use]
    pub const fn unsigned(v: u64) -> Self {
        Self::Scalar(Scalar::Unsigned(v))
    }

    /// Shorthand for a signed scalar.
    #[must_use]
    pub const fn signed(v: i64) -> Self {
        Self::Scalar(Scalar::Signed(v))
    }

    /// Shorthand for a floating point scalar.
    #[must_use]
    pub const fn float(v: f64) -> Self {
        Self::Scalar(Scalar::Float(v))
    }

    /// Looks up a record field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Self::Scalar(_) => None,
        }
    }
}
