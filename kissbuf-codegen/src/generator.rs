//! Main code generator.

use crate::c::{CodecGenerator, HelperGenerator, InterfaceGenerator, banner};
use crate::config::GeneratorConfig;
use kissbuf_schema::ir::SchemaIr;
use std::path::{Component, Path};

/// The two text units produced by one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnits {
    /// `.c` unit with helpers and aggregate functions.
    pub implementation: String,
    /// `.h` unit with status macros and prototypes.
    pub interface: String,
}

/// Code generator for a resolved schema.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, config: &'a GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Generates both units. Pure: nothing is written anywhere.
    #[must_use]
    pub fn generate(&self) -> GeneratedUnits {
        GeneratedUnits {
            implementation: self.generate_implementation(),
            interface: self.generate_interface(),
        }
    }

    fn generate_implementation(&self) -> String {
        let mut output = String::new();

        output.push_str(&banner(self.config.source_header()));
        output.push('\n');
        output.push_str("#include <stddef.h>\n");
        output.push_str("#include <stdint.h>\n");
        output.push_str("#include <string.h>\n\n");
        output.push_str(&format!("#include \"{}\"\n", self.config.source_header()));
        output.push_str(&format!(
            "#include \"{}\"\n",
            interface_include(&self.config.implementation_file, &self.config.interface_file)
        ));

        output.push_str(&HelperGenerator::new(&self.config.registry).generate());
        output.push_str(&CodecGenerator::new(self.ir).generate());

        output
    }

    fn generate_interface(&self) -> String {
        let guard = self.config.include_guard();
        InterfaceGenerator::new(self.ir, self.config.source_header(), &guard).generate()
    }
}

/// Include path of the interface unit, relative to the implementation unit.
///
/// Paths with anything other than plain names (`..`, roots, prefixes) are
/// used as given.
fn interface_include(implementation_file: &str, interface_file: &str) -> String {
    fn normal_parts(path: &str) -> Option<Vec<&str>> {
        Path::new(path)
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                Component::CurDir => Some("."),
                _ => None,
            })
            .filter(|part| *part != Some("."))
            .collect()
    }

    let (Some(from), Some(to)) = (
        normal_parts(implementation_file),
        normal_parts(interface_file),
    ) else {
        return interface_file.to_string();
    };
    let Some((_, from_dir)) = from.split_last() else {
        return interface_file.to_string();
    };
    let Some((_, to_dir)) = to.split_last() else {
        return interface_file.to_string();
    };

    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts = vec![".."; from_dir.len() - common];
    parts.extend_from_slice(&to[common..]);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kissbuf_schema::parse_declarations;

    fn units(source: &str, config: &GeneratorConfig) -> GeneratedUnits {
        let schema = parse_declarations(source).expect("Failed to parse");
        let ir = SchemaIr::resolve(&schema, &config.registry, &config.opaque_types)
            .expect("Failed to resolve");
        Generator::new(&ir, config).generate()
    }

    #[test]
    fn test_implementation_preamble() {
        let config = GeneratorConfig::default();
        let units = units("typedef struct { int16_t x; int16_t y; } Point;", &config);

        assert!(
            units
                .implementation
                .starts_with("/* Generated by kissbuf from example.h. Do not edit by hand. */\n")
        );
        assert!(units.implementation.contains("#include <string.h>\n"));
        assert!(units.implementation.contains("#include \"example.h\"\n"));
        assert!(units.implementation.contains("#include \"generated_serde.h\"\n"));
    }

    #[test]
    fn test_helpers_precede_functions() {
        let config = GeneratorConfig::default();
        let units = units("typedef struct { int16_t x; int16_t y; } Point;", &config);

        let helper = units
            .implementation
            .find("void serializeInt16LE(")
            .expect("helper present");
        let function = units
            .implementation
            .find("int PointSerialize(")
            .expect("function present");
        assert!(helper < function);
    }

    #[test]
    fn test_interface_uses_config() {
        let mut config = GeneratorConfig::default().with_source_header("shapes.h");
        config.interface_file = "out/shapes_serde.h".to_string();
        let units = units("typedef struct { uint8_t a; } A;", &config);

        assert!(units.interface.contains("#ifndef SHAPES_SERDE_H\n"));
        assert!(units.interface.contains("#include \"shapes.h\"\n"));
        assert!(units.implementation.contains("#include \"out/shapes_serde.h\"\n"));
    }

    #[test]
    fn test_interface_include_is_relative_to_implementation() {
        assert_eq!(
            interface_include("generated_serde.c", "generated_serde.h"),
            "generated_serde.h"
        );
        assert_eq!(interface_include("src/wire.c", "include/wire.h"), "../include/wire.h");
        assert_eq!(interface_include("src/wire.c", "src/wire.h"), "wire.h");
        assert_eq!(interface_include("a/b/wire.c", "a/wire.h"), "../wire.h");
        assert_eq!(interface_include("wire.c", "include/wire.h"), "include/wire.h");
        assert_eq!(interface_include("./src/wire.c", "src/wire.h"), "wire.h");
        assert_eq!(interface_include("wire.c", "../wire.h"), "../wire.h");
    }

    #[test]
    fn test_split_layout_includes_interface_by_relative_path() {
        let mut config = GeneratorConfig::default();
        config.implementation_file = "src/wire.c".to_string();
        config.interface_file = "include/wire.h".to_string();
        let units = units("typedef struct { uint8_t a; } A;", &config);

        assert!(units.implementation.contains("#include \"../include/wire.h\"\n"));
        assert!(units.interface.contains("#ifndef WIRE_H\n"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = GeneratorConfig::default();
        let source = "typedef struct { Point a; Point b; } Segment;\n\
                      typedef struct { int16_t x; int16_t y; } Point;";
        assert_eq!(units(source, &config), units(source, &config));
    }
}
