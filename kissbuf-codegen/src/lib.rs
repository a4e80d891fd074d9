//! # kissbuf Codegen
//!
//! Generation of portable little-endian C codecs from struct declarations.
//!
//! This crate provides:
//! - Primitive helper generation from the type registry
//! - Aggregate encode/decode function generation in dependency order
//! - Interface unit generation with status macros and prototypes
//! - An in-process reference codec over the same layout
//! - Writing generated units to an output directory

pub mod c;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod reference;

pub use config::GeneratorConfig;
pub use emitter::{EmittedFiles, Emitter};
pub use error::CodegenError;
pub use generator::{GeneratedUnits, Generator};
pub use reference::ReferenceCodec;

use kissbuf_schema::SchemaIr;
use std::path::Path;

/// Parses and resolves declarations.
///
/// # Arguments
/// * `source` - Declaration header text
/// * `config` - Registry and opaque types to resolve against
///
/// # Errors
/// Returns `CodegenError` if parsing, ordering, or layout fails.
pub fn resolve(source: &str, config: &GeneratorConfig) -> Result<SchemaIr, CodegenError> {
    let schema = kissbuf_schema::parse_declarations(source)?;
    let ir = SchemaIr::resolve(&schema, &config.registry, &config.opaque_types)?;
    tracing::debug!(order = ?ir.order(), "resolved schema");
    Ok(ir)
}

/// Generates both C units from declaration text.
///
/// # Errors
/// Returns `CodegenError` if parsing, ordering, or layout fails.
pub fn generate_from_str(
    source: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedUnits, CodegenError> {
    let ir = resolve(source, config)?;
    Ok(Generator::new(&ir, config).generate())
}

/// Generates both C units from a declaration header file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &Path,
    config: &GeneratorConfig,
) -> Result<GeneratedUnits, CodegenError> {
    let source = std::fs::read_to_string(path)?;
    generate_from_str(&source, config)
}

/// Runs the whole pipeline and writes both units into `out_dir`.
///
/// Nothing is written unless generation succeeds. When the configuration
/// leaves `source_header` unset, generated code includes `header` by its
/// file name.
///
/// # Errors
/// Returns `CodegenError` if any stage fails.
pub fn generate_to_dir(
    header: &Path,
    out_dir: &Path,
    config: &GeneratorConfig,
) -> Result<EmittedFiles, CodegenError> {
    tracing::info!(header = %header.display(), "generating codecs");
    let mut config = config.clone();
    if config.source_header.is_none() {
        config.source_header = Some(header_include(header));
    }
    let units = generate_from_file(header, &config)?;
    Emitter::new(out_dir).emit(&config, &units)
}

fn header_include(header: &Path) -> String {
    header
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| header.display().to_string())
}
