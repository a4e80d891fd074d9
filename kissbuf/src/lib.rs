//! # kissbuf
//!
//! Generates portable little-endian C encode/decode routines from plain
//! `typedef struct` declarations.
//!
//! ## Features
//!
//! - **Declaration parsing** - `typedef struct { ... } Name;` blocks out of an ordinary header
//! - **Dependency ordering** - nested aggregates are generated before their users
//! - **Fixed wire layout** - fields back to back, no padding, least significant byte first
//! - **Bounds-checked C** - every generated function rejects short buffers
//!
//! ## Quick Start
//!
//! ```ignore
//! use kissbuf::prelude::*;
//!
//! let config = GeneratorConfig::default();
//! let units = generate_from_str(
//!     "typedef struct { int16_t x; int16_t y; } Point;",
//!     &config,
//! )?;
//! println!("{}", units.implementation);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Primitive registry, buffer traits, dynamic values
//! - [`schema`] - Declaration parsing, dependency graph, layout
//! - [`codegen`] - C generation, reference codec, emitter

pub mod prelude;

/// Primitive registry, buffers and runtime errors.
pub mod core {
    pub use kissbuf_core::*;
}

/// Declaration parsing, ordering and layout.
pub mod schema {
    pub use kissbuf_schema::*;
}

/// C code generation.
pub mod codegen {
    pub use kissbuf_codegen::*;
}

// Re-export commonly used items at the crate root
pub use kissbuf_codegen::{
    CodegenError, GeneratedUnits, GeneratorConfig, ReferenceCodec, generate_from_file,
    generate_from_str, generate_to_dir,
};
pub use kissbuf_core::{TypeRegistry, Value};
pub use kissbuf_schema::{SchemaIr, parse_declarations};
