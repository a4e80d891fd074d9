//! Generator configuration.
//!
//! Everything the pipeline used to take from module-level constants (the
//! primitive table, output file names, the declaration header to include)
//! is carried by an explicit [`GeneratorConfig`].

use crate::error::CodegenError;
use kissbuf_core::{PrimitiveType, TypeRegistry};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Default include name of the declaration header.
pub const DEFAULT_SOURCE_HEADER: &str = "example.h";
/// Default implementation unit file name.
pub const DEFAULT_IMPLEMENTATION_FILE: &str = "generated_serde.c";
/// Default interface unit file name.
pub const DEFAULT_INTERFACE_FILE: &str = "generated_serde.h";

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Primitive types available to declarations.
    pub registry: TypeRegistry,
    /// Name under which generated code includes the declaration header.
    ///
    /// When unset, [`crate::generate_to_dir`] uses the input header's file
    /// name and the in-memory entry points use [`DEFAULT_SOURCE_HEADER`].
    pub source_header: Option<String>,
    /// File name of the implementation unit.
    pub implementation_file: String,
    /// File name of the interface unit.
    pub interface_file: String,
    /// Include guard macro; derived from `interface_file` when unset.
    pub include_guard: Option<String>,
    /// Types defined elsewhere that are copied verbatim with `sizeof`.
    pub opaque_types: BTreeSet<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            registry: TypeRegistry::standard(),
            source_header: None,
            implementation_file: DEFAULT_IMPLEMENTATION_FILE.to_string(),
            interface_file: DEFAULT_INTERFACE_FILE.to_string(),
            include_guard: None,
            opaque_types: BTreeSet::new(),
        }
    }
}

/// On-disk shape of a configuration file. Every key is optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    registry: Option<Vec<PrimitiveType>>,
    source_header: Option<String>,
    implementation_file: Option<String>,
    interface_file: Option<String>,
    include_guard: Option<String>,
    #[serde(default)]
    opaque_types: BTreeSet<String>,
}

impl ConfigFile {
    fn into_config(self) -> Result<GeneratorConfig, CodegenError> {
        let defaults = GeneratorConfig::default();
        let registry = match self.registry {
            Some(primitives) => TypeRegistry::try_from(primitives)?,
            None => defaults.registry,
        };

        Ok(GeneratorConfig {
            registry,
            source_header: self.source_header,
            implementation_file: self
                .implementation_file
                .unwrap_or(defaults.implementation_file),
            interface_file: self.interface_file.unwrap_or(defaults.interface_file),
            include_guard: self.include_guard,
            opaque_types: self.opaque_types,
        })
    }
}

impl GeneratorConfig {
    /// Parses a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` if the JSON is invalid and
    /// `CodegenError::Registry` if the registry violates its invariants.
    pub fn from_json_str(json: &str) -> Result<Self, CodegenError> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|e| CodegenError::config(e.to_string()))?;
        file.into_config()
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    /// Returns `CodegenError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CodegenError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Sets the declaration header include name.
    #[must_use]
    pub fn with_source_header(mut self, header: impl Into<String>) -> Self {
        self.source_header = Some(header.into());
        self
    }

    /// Allows a type through the raw-copy fallback path.
    #[must_use]
    pub fn with_opaque_type(mut self, type_name: impl Into<String>) -> Self {
        self.opaque_types.insert(type_name.into());
        self
    }

    /// Returns the declaration header include name.
    #[must_use]
    pub fn source_header(&self) -> &str {
        self.source_header.as_deref().unwrap_or(DEFAULT_SOURCE_HEADER)
    }

    /// Returns the include guard macro for the interface unit.
    ///
    /// `generated_serde.h` becomes `GENERATED_SERDE_H`.
    #[must_use]
    pub fn include_guard(&self) -> String {
        if let Some(guard) = &self.include_guard {
            return guard.clone();
        }
        let file_name = Path::new(&self.interface_file)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(&self.interface_file);
        let mut guard: String = file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        if guard.starts_with(|c: char| c.is_ascii_digit()) {
            guard.insert(0, '_');
        }
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kissbuf_core::RegistryError;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.source_header, None);
        assert_eq!(config.source_header(), "example.h");
        assert_eq!(config.implementation_file, "generated_serde.c");
        assert_eq!(config.interface_file, "generated_serde.h");
        assert!(config.registry.is_primitive("int16_t"));
        assert!(config.opaque_types.is_empty());
    }

    #[test]
    fn test_include_guard_derived() {
        let mut config = GeneratorConfig::default();
        assert_eq!(config.include_guard(), "GENERATED_SERDE_H");

        config.interface_file = "out/wire-codec.h".to_string();
        assert_eq!(config.include_guard(), "WIRE_CODEC_H");

        config.include_guard = Some("MY_GUARD".to_string());
        assert_eq!(config.include_guard(), "MY_GUARD");
    }

    #[test]
    fn test_from_json_partial() {
        let config = GeneratorConfig::from_json_str(
            r#"{"source_header": "shapes.h", "opaque_types": ["timeval"]}"#,
        )
        .expect("Failed to parse config");
        assert_eq!(config.source_header(), "shapes.h");
        assert!(config.opaque_types.contains("timeval"));
        assert_eq!(config.registry, TypeRegistry::standard());
    }

    #[test]
    fn test_from_json_custom_registry() {
        let config = GeneratorConfig::from_json_str(
            r#"{"registry": [
                {"name": "u16", "byte_width": 2, "encode_fn": "putU16", "decode_fn": "getU16", "repr": "unsigned"}
            ]}"#,
        )
        .expect("Failed to parse config");
        assert_eq!(config.registry.len(), 1);
        assert!(!config.registry.is_primitive("uint16_t"));
    }

    #[test]
    fn test_from_json_rejects_invalid_registry() {
        let result = GeneratorConfig::from_json_str(
            r#"{"registry": [
                {"name": "u16", "byte_width": 0, "encode_fn": "a", "decode_fn": "b", "repr": "unsigned"}
            ]}"#,
        );
        assert!(matches!(
            result,
            Err(CodegenError::Registry(RegistryError::ZeroWidth { ref name })) if name == "u16"
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicate_primitive() {
        let result = GeneratorConfig::from_json_str(
            r#"{"registry": [
                {"name": "u8", "byte_width": 1, "encode_fn": "a", "decode_fn": "b", "repr": "unsigned"},
                {"name": "u8", "byte_width": 1, "encode_fn": "c", "decode_fn": "d", "repr": "unsigned"}
            ]}"#,
        );
        assert!(matches!(
            result,
            Err(CodegenError::Registry(RegistryError::DuplicatePrimitive { .. }))
        ));
    }

    #[test]
    fn test_from_json_leaves_source_header_unset() {
        let config = GeneratorConfig::from_json_str(r#"{"opaque_types": ["timeval"]}"#)
            .expect("Failed to parse config");
        assert_eq!(config.source_header, None);
        assert_eq!(config.interface_file, "generated_serde.h");
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let result = GeneratorConfig::from_json_str(r#"{"output_dir": "x"}"#);
        assert!(matches!(result, Err(CodegenError::Config { .. })));
    }

    #[test]
    fn test_builders() {
        let config = GeneratorConfig::default()
            .with_source_header("wire.h")
            .with_opaque_type("struct_tm");
        assert_eq!(config.source_header(), "wire.h");
        assert!(config.opaque_types.contains("struct_tm"));
    }
}
