//! # kissbuf Schema
//!
//! Declaration parsing and layout resolution.
//!
//! This crate provides:
//! - A tokenizer and recursive-descent parser for `typedef struct` declarations
//! - Schema types for aggregates and their ordered fields
//! - Dependency graph construction and topological ordering with cycle detection
//! - Byte layout calculation with literal and symbolic offsets
//! - Intermediate representation for code generation

pub mod error;
pub mod graph;
pub mod ir;
pub mod layout;
pub mod lexer;
pub mod parser;
pub mod types;

pub use error::{ParseError, SchemaError};
pub use graph::DependencyGraph;
pub use ir::{FieldPath, ResolvedAggregate, ResolvedField, SchemaIr};
pub use layout::{LayoutCalculator, Offset};
pub use parser::parse_declarations;
pub use types::{AggregateType, Field, Schema, Span};
