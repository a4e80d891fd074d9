//! Prelude module for convenient imports.
//!
//! ```ignore
//! use kissbuf::prelude::*;
//! ```

// Core types
pub use kissbuf_core::buffer::{ReadBuffer, WriteBuffer};
pub use kissbuf_core::error::{Error as CoreError, Result as CoreResult};
pub use kissbuf_core::types::{PrimitiveType, ScalarRepr, TypeRegistry};
pub use kissbuf_core::value::{Scalar, Value};

// Schema types
pub use kissbuf_schema::{
    AggregateType, DependencyGraph, Field, FieldPath, Offset, ParseError, ResolvedAggregate,
    ResolvedField, Schema, SchemaError, SchemaIr, parse_declarations,
};

// Codegen types
pub use kissbuf_codegen::{
    CodegenError, EmittedFiles, Emitter, GeneratedUnits, Generator, GeneratorConfig,
    ReferenceCodec, generate_from_file, generate_from_str, generate_to_dir, resolve,
};
