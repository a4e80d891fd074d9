//! Error types for declaration parsing and layout resolution.

use crate::types::Span;
use thiserror::Error;

/// Error type for declaration parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A declaration or field could not be parsed.
    #[error("malformed declaration at {line}:{column}: {reason}")]
    MalformedDeclaration {
        /// Line of the offending token (1-based).
        line: usize,
        /// Column of the offending token (1-based).
        column: usize,
        /// What was wrong.
        reason: String,
    },

    /// The same aggregate name was declared twice.
    #[error("duplicate type name '{name}' at line {line} (first declared at line {first_line})")]
    DuplicateTypeName {
        /// Aggregate name.
        name: String,
        /// Line of the redeclaration.
        line: usize,
        /// Line of the first declaration.
        first_line: usize,
    },
}

/// Error type for dependency resolution and layout computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A field type is neither a primitive, a declared aggregate nor an opaque type.
    #[error("unknown type '{type_name}' for field '{field}' in '{aggregate}'")]
    UnknownType {
        /// Unresolved type name.
        type_name: String,
        /// Field name.
        field: String,
        /// Aggregate containing the field.
        aggregate: String,
    },

    /// Type not found.
    #[error("type '{name}' not found")]
    TypeNotFound {
        /// Type name.
        name: String,
    },

    /// The aggregates embed each other in a cycle.
    #[error("cyclic dependency detected: {path}")]
    CyclicDependency {
        /// Path of the cycle, e.g. `A -> B -> A`.
        path: String,
    },
}

impl ParseError {
    /// Creates a malformed declaration error at the given span.
    pub fn malformed(span: Span, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            line: span.line,
            column: span.column,
            reason: reason.into(),
        }
    }
}

impl SchemaError {
    /// Creates a cyclic dependency error from the nodes of the cycle.
    ///
    /// The first node is repeated at the end of the rendered path.
    pub fn cycle(nodes: &[&str]) -> Self {
        let mut path: Vec<&str> = nodes.to_vec();
        if let Some(first) = path.first().copied() {
            path.push(first);
        }
        Self::CyclicDependency {
            path: path.join(" -> "),
        }
    }
}
