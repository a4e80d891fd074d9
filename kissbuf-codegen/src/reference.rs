//! In-process reference codec.
//!
//! [`ReferenceCodec`] evaluates a [`SchemaIr`] over dynamic [`Value`]s using
//! exactly the layout the generated C follows: fields back to back in
//! declaration order, primitives little-endian, nested aggregates recursing
//! into the remaining buffer. It lets the round-trip and bounds behavior of
//! a schema be checked without a C toolchain.
//!
//! Layouts involving opaque types cannot be evaluated here and are rejected
//! with `SymbolicLayout`.

use kissbuf_core::buffer::{ReadBuffer, WriteBuffer};
use kissbuf_core::error::{Error, Result};
use kissbuf_core::value::Value;
use kissbuf_schema::ir::{FieldPath, ResolvedAggregate, SchemaIr};

/// Reference encoder/decoder over a resolved schema.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCodec<'a> {
    ir: &'a SchemaIr,
}

impl<'a> ReferenceCodec<'a> {
    /// Creates a codec over `ir`.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self { ir }
    }

    /// Returns the wire size of an aggregate.
    ///
    /// # Errors
    /// Returns `UnknownAggregate` or `SymbolicLayout`.
    pub fn size_of(&self, type_name: &str) -> Result<usize> {
        literal_size(self.lookup(type_name)?)
    }

    /// Encodes `value` as `type_name` into the front of `buffer`.
    ///
    /// Returns the number of bytes written. On error `buffer` is left
    /// untouched.
    ///
    /// # Errors
    /// Returns `BufferTooSmall` if `buffer` is shorter than the wire size,
    /// and `TypeMismatch` or `ValueOutOfRange` if `value` does not fit.
    pub fn encode(&self, type_name: &str, value: &Value, buffer: &mut [u8]) -> Result<usize> {
        let aggregate = self.lookup(type_name)?;
        let size = literal_size(aggregate)?;
        check_len(size, buffer.len())?;

        let mut scratch = vec![0u8; size];
        self.encode_aggregate(aggregate, value, &mut scratch)?;
        buffer[..size].copy_from_slice(&scratch);
        Ok(size)
    }

    /// Decodes a `type_name` value from the front of `buffer`.
    ///
    /// # Errors
    /// Returns `BufferTooSmall` if `buffer` is shorter than the wire size.
    pub fn decode(&self, type_name: &str, buffer: &[u8]) -> Result<Value> {
        let aggregate = self.lookup(type_name)?;
        self.decode_aggregate(aggregate, buffer)
    }

    fn lookup(&self, type_name: &str) -> Result<&'a ResolvedAggregate> {
        self.ir.get(type_name).ok_or_else(|| Error::UnknownAggregate {
            name: type_name.to_string(),
        })
    }

    fn encode_aggregate(
        &self,
        aggregate: &ResolvedAggregate,
        value: &Value,
        buffer: &mut [u8],
    ) -> Result<()> {
        check_len(literal_size(aggregate)?, buffer.len())?;
        if !matches!(value, Value::Record(_)) {
            return Err(Error::TypeMismatch {
                field: aggregate.name.clone(),
                expected: "record".to_string(),
            });
        }

        for field in &aggregate.fields {
            let offset = field_offset(aggregate, field.offset.literal())?;
            let Some(field_value) = value.field(&field.name) else {
                return Err(Error::TypeMismatch {
                    field: field.name.clone(),
                    expected: format!("value of type {}", field.type_name),
                });
            };

            match &field.path {
                FieldPath::Primitive(primitive) => {
                    let Value::Scalar(scalar) = field_value else {
                        return Err(Error::TypeMismatch {
                            field: field.name.clone(),
                            expected: format!("{:?} scalar", primitive.repr),
                        });
                    };
                    let bits = scalar.to_bits(&field.name, primitive.repr, primitive.byte_width)?;
                    buffer.put_uint_le(offset, primitive.byte_width, bits);
                }
                FieldPath::Aggregate { type_name } => {
                    let nested = self.lookup(type_name)?;
                    self.encode_aggregate(nested, field_value, &mut buffer[offset..])?;
                }
                FieldPath::Opaque { .. } => {
                    return Err(Error::SymbolicLayout {
                        name: aggregate.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    fn decode_aggregate(&self, aggregate: &ResolvedAggregate, buffer: &[u8]) -> Result<Value> {
        check_len(literal_size(aggregate)?, buffer.len())?;

        let mut fields = Vec::with_capacity(aggregate.fields.len());
        for field in &aggregate.fields {
            let offset = field_offset(aggregate, field.offset.literal())?;
            let value = match &field.path {
                FieldPath::Primitive(primitive) => {
                    Value::Scalar(buffer.get_scalar(offset, primitive))
                }
                FieldPath::Aggregate { type_name } => {
                    let nested = self.lookup(type_name)?;
                    self.decode_aggregate(nested, &buffer[offset..])?
                }
                FieldPath::Opaque { .. } => {
                    return Err(Error::SymbolicLayout {
                        name: aggregate.name.clone(),
                    });
                }
            };
            fields.push((field.name.clone(), value));
        }

        Ok(Value::Record(fields))
    }
}

fn literal_size(aggregate: &ResolvedAggregate) -> Result<usize> {
    aggregate.size.literal().ok_or_else(|| Error::SymbolicLayout {
        name: aggregate.name.clone(),
    })
}

fn field_offset(aggregate: &ResolvedAggregate, offset: Option<usize>) -> Result<usize> {
    offset.ok_or_else(|| Error::SymbolicLayout {
        name: aggregate.name.clone(),
    })
}

fn check_len(required: usize, available: usize) -> Result<()> {
    if available < required {
        return Err(Error::BufferTooSmall {
            required,
            available,
        });
    }
    Ok(())
}
