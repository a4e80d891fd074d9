//! Schema type definitions.
//!
//! This module contains the data structures produced by the parser: the
//! declared aggregates and their ordered fields. Field type names are not
//! resolved here.

use crate::error::ParseError;
use std::collections::HashMap;
use std::fmt;

/// Source position of a token (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number.
    pub line: usize,
    /// Column number.
    pub column: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A field of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Type name, multi-token names joined by single spaces.
    pub type_name: String,
    /// Field name.
    pub name: String,
    /// Position of the field's first token.
    pub span: Span,
}

impl Field {
    /// Creates a new field.
    #[must_use]
    pub fn new(type_name: impl Into<String>, name: impl Into<String>, span: Span) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            span,
        }
    }
}

/// A declared aggregate (`typedef struct { ... } Name;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateType {
    /// Type name.
    pub name: String,
    /// Fields in declaration (and wire) order.
    pub fields: Vec<Field>,
    /// Position of the `typedef` keyword.
    pub span: Span,
}

impl AggregateType {
    /// Creates an aggregate with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            span,
        }
    }

    /// Appends a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }
}

/// Parsed declarations, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Aggregates in declaration order.
    pub aggregates: Vec<AggregateType>,
    /// Aggregate lookup map.
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an aggregate.
    ///
    /// # Errors
    /// Returns `DuplicateTypeName` if an aggregate with the same name exists.
    pub fn add_aggregate(&mut self, aggregate: AggregateType) -> Result<(), ParseError> {
        if let Some(existing) = self.get(&aggregate.name) {
            return Err(ParseError::DuplicateTypeName {
                name: aggregate.name,
                line: aggregate.span.line,
                first_line: existing.span.line,
            });
        }
        self.index
            .insert(aggregate.name.clone(), self.aggregates.len());
        self.aggregates.push(aggregate);
        Ok(())
    }

    /// Looks up an aggregate by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AggregateType> {
        self.index.get(name).map(|&idx| &self.aggregates[idx])
    }

    /// Returns the declaration index of an aggregate.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if an aggregate with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over aggregates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregateType> {
        self.aggregates.iter()
    }

    /// Returns the number of aggregates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    /// Returns true if no aggregate was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: usize) -> Span {
        Span { line, column: 1 }
    }

    #[test]
    fn test_add_and_lookup() {
        let mut schema = Schema::new();
        let mut point = AggregateType::new("Point", span(1));
        point.add_field(Field::new("int16_t", "x", span(1)));
        schema.add_aggregate(point).expect("Failed to add");

        assert!(schema.contains("Point"));
        assert_eq!(schema.index_of("Point"), Some(0));
        assert_eq!(schema.get("Point").map(|p| p.fields.len()), Some(1));
        assert!(schema.get("Segment").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut schema = Schema::new();
        schema
            .add_aggregate(AggregateType::new("Point", span(1)))
            .expect("Failed to add");
        let result = schema.add_aggregate(AggregateType::new("Point", span(7)));
        assert_eq!(
            result,
            Err(ParseError::DuplicateTypeName {
                name: "Point".to_string(),
                line: 7,
                first_line: 1,
            })
        );
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span { line: 4, column: 12 }.to_string(), "4:12");
    }
}
