//! Aggregate encode/decode function generation.

use super::{STATUS_BUFFER_TOO_SMALL_MACRO, STATUS_OK_MACRO};
use kissbuf_schema::ir::{FieldPath, ResolvedAggregate, ResolvedField, SchemaIr};
use kissbuf_schema::layout::Offset;

/// Generator for aggregate codec functions.
pub struct CodecGenerator<'a> {
    ir: &'a SchemaIr,
}

impl<'a> CodecGenerator<'a> {
    /// Creates a new codec generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self { ir }
    }

    /// Generates every encode/decode pair in topological order.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        for aggregate in &self.ir.aggregates {
            output.push('\n');
            output.push_str(&format!(
                "/* {}: {} bytes on the wire */\n",
                aggregate.name, aggregate.size
            ));
            output.push_str(&self.generate_serialize(aggregate));
            output.push('\n');
            output.push_str(&self.generate_deserialize(aggregate));
        }

        output
    }

    /// Returns the encode prototype, without a trailing semicolon or body.
    #[must_use]
    pub fn serialize_signature(aggregate: &ResolvedAggregate) -> String {
        format!(
            "int {}(const {} *input, uint8_t *buffer, size_t bufferLen)",
            aggregate.serialize_fn(),
            aggregate.name
        )
    }

    /// Returns the decode prototype, without a trailing semicolon or body.
    #[must_use]
    pub fn deserialize_signature(aggregate: &ResolvedAggregate) -> String {
        format!(
            "int {}(const uint8_t *buffer, size_t bufferLen, {} *output)",
            aggregate.deserialize_fn(),
            aggregate.name
        )
    }

    fn generate_serialize(&self, aggregate: &ResolvedAggregate) -> String {
        let mut output = String::new();

        output.push_str(&Self::serialize_signature(aggregate));
        output.push_str(" {\n");
        output.push_str(&Self::prologue(aggregate, "input"));

        for field in &aggregate.fields {
            let at = buffer_at(&field.offset);
            match &field.path {
                FieldPath::Primitive(primitive) => {
                    output.push_str(&format!(
                        "    {}(input->{}, {at});\n",
                        primitive.encode_fn, field.name
                    ));
                }
                FieldPath::Aggregate { type_name } => {
                    output.push_str(&format!(
                        "    status = {}(&input->{}, {at}, {});\n",
                        kissbuf_schema::ir::serialize_fn_name(type_name),
                        field.name,
                        remaining(&field.offset)
                    ));
                    output.push_str(&propagate_status());
                }
                FieldPath::Opaque { type_name } => {
                    output.push_str(&format!(
                        "    memcpy({at}, &input->{}, sizeof({type_name}));\n",
                        field.name
                    ));
                }
            }
        }

        output.push_str(&format!("    return {STATUS_OK_MACRO};\n"));
        output.push_str("}\n");
        output
    }

    fn generate_deserialize(&self, aggregate: &ResolvedAggregate) -> String {
        let mut output = String::new();

        output.push_str(&Self::deserialize_signature(aggregate));
        output.push_str(" {\n");
        output.push_str(&Self::prologue(aggregate, "output"));

        for field in &aggregate.fields {
            let at = buffer_at(&field.offset);
            match &field.path {
                FieldPath::Primitive(primitive) => {
                    output.push_str(&format!(
                        "    output->{} = {}({at});\n",
                        field.name, primitive.decode_fn
                    ));
                }
                FieldPath::Aggregate { type_name } => {
                    output.push_str(&format!(
                        "    status = {}({at}, {}, &output->{});\n",
                        kissbuf_schema::ir::deserialize_fn_name(type_name),
                        remaining(&field.offset),
                        field.name
                    ));
                    output.push_str(&propagate_status());
                }
                FieldPath::Opaque { type_name } => {
                    output.push_str(&format!(
                        "    memcpy(&output->{}, {at}, sizeof({type_name}));\n",
                        field.name
                    ));
                }
            }
        }

        output.push_str(&format!("    return {STATUS_OK_MACRO};\n"));
        output.push_str("}\n");
        output
    }

    /// Status declaration, unused-parameter casts and the bounds check.
    fn prologue(aggregate: &ResolvedAggregate, record: &str) -> String {
        let mut output = String::new();

        if has_nested(&aggregate.fields) {
            output.push_str("    int status;\n");
        }
        if aggregate.fields.is_empty() {
            output.push_str(&format!("    (void){record};\n"));
            output.push_str("    (void)buffer;\n");
        }
        // Zero-width records fit any buffer.
        if aggregate.size == Offset::ZERO {
            output.push_str("    (void)bufferLen;\n");
        } else {
            output.push_str(&format!(
                "    if (bufferLen < {}) {{\n        return {STATUS_BUFFER_TOO_SMALL_MACRO};\n    }}\n",
                aggregate.size.c_expr()
            ));
        }

        output
    }
}

fn has_nested(fields: &[ResolvedField]) -> bool {
    fields
        .iter()
        .any(|f| matches!(f.path, FieldPath::Aggregate { .. }))
}

fn buffer_at(offset: &Offset) -> String {
    if *offset == Offset::ZERO {
        "buffer".to_string()
    } else {
        format!("buffer + {}", offset.c_expr())
    }
}

fn remaining(offset: &Offset) -> String {
    if *offset == Offset::ZERO {
        "bufferLen".to_string()
    } else {
        format!("bufferLen - {}", offset.c_expr())
    }
}

fn propagate_status() -> String {
    format!("    if (status != {STATUS_OK_MACRO}) {{\n        return status;\n    }}\n")
}
