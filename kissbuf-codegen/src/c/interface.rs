//! Interface unit generation.

use super::functions::CodecGenerator;
use super::{STATUS_BUFFER_TOO_SMALL_MACRO, STATUS_OK_MACRO, banner};
use kissbuf_core::{STATUS_BUFFER_TOO_SMALL, STATUS_OK};
use kissbuf_schema::ir::SchemaIr;

/// Generator for the `.h` interface unit.
pub struct InterfaceGenerator<'a> {
    ir: &'a SchemaIr,
    source_header: &'a str,
    include_guard: &'a str,
}

impl<'a> InterfaceGenerator<'a> {
    /// Creates a new interface generator.
    ///
    /// # Arguments
    /// * `ir` - Resolved schema
    /// * `source_header` - Include name of the declaration header
    /// * `include_guard` - Guard macro wrapping the unit
    #[must_use]
    pub fn new(ir: &'a SchemaIr, source_header: &'a str, include_guard: &'a str) -> Self {
        Self {
            ir,
            source_header,
            include_guard,
        }
    }

    /// Generates the interface unit text.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let guard = self.include_guard;

        output.push_str(&banner(self.source_header));
        output.push('\n');
        output.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        output.push_str(&format!("#include \"{}\"\n", self.source_header));
        output.push_str("#include <stddef.h>\n#include <stdint.h>\n\n");

        output.push_str(&format!("#define {STATUS_OK_MACRO} {STATUS_OK}\n"));
        output.push_str(&format!(
            "#define {STATUS_BUFFER_TOO_SMALL_MACRO} ({STATUS_BUFFER_TOO_SMALL})\n"
        ));

        for aggregate in &self.ir.aggregates {
            output.push('\n');
            output.push_str(&format!(
                "{};\n",
                CodecGenerator::serialize_signature(aggregate)
            ));
            output.push_str(&format!(
                "{};\n",
                CodecGenerator::deserialize_signature(aggregate)
            ));
        }

        output.push_str(&format!("\n#endif /* {guard} */\n"));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kissbuf_core::TypeRegistry;
    use kissbuf_schema::parse_declarations;
    use std::collections::BTreeSet;

    fn ir(source: &str) -> SchemaIr {
        let schema = parse_declarations(source).expect("Failed to parse");
        SchemaIr::resolve(&schema, &TypeRegistry::standard(), &BTreeSet::new())
            .expect("Failed to resolve")
    }

    #[test]
    fn test_interface_layout() {
        let ir = ir("typedef struct { int16_t x; int16_t y; } Point;");
        let output = InterfaceGenerator::new(&ir, "shapes.h", "SHAPES_SERDE_H").generate();

        assert!(output.starts_with("/* Generated by kissbuf from shapes.h."));
        assert!(output.contains("#ifndef SHAPES_SERDE_H\n#define SHAPES_SERDE_H\n"));
        assert!(output.contains("#include \"shapes.h\"\n"));
        assert!(output.contains("#define KISSBUF_OK 0\n"));
        assert!(output.contains("#define KISSBUF_ERR_BUFFER_TOO_SMALL (-1)\n"));
        assert!(output.contains(
            "int PointSerialize(const Point *input, uint8_t *buffer, size_t bufferLen);\n"
        ));
        assert!(output.contains(
            "int PointDeserialize(const uint8_t *buffer, size_t bufferLen, Point *output);\n"
        ));
        assert!(output.ends_with("#endif /* SHAPES_SERDE_H */\n"));
    }

    #[test]
    fn test_prototypes_in_topological_order() {
        let ir = ir("typedef struct { Point a; Point b; } Segment;\n\
                     typedef struct { int16_t x; int16_t y; } Point;");
        let output = InterfaceGenerator::new(&ir, "example.h", "GENERATED_SERDE_H").generate();

        let point = output.find("int PointSerialize(").expect("Point prototype");
        let segment = output
            .find("int SegmentSerialize(")
            .expect("Segment prototype");
        assert!(point < segment);
    }

    #[test]
    fn test_empty_schema_has_no_prototypes() {
        let ir = ir("");
        let output = InterfaceGenerator::new(&ir, "example.h", "GENERATED_SERDE_H").generate();
        assert!(!output.contains("Serialize("));
        assert!(output.contains("#define KISSBUF_OK 0"));
    }
}
