//! Intermediate representation for code generation.
//!
//! This module provides a resolved view of the schema: aggregates in
//! topological order, each field with its offset, size and codec path.
//! Both the C generator and the reference codec consume it.

use crate::error::SchemaError;
use crate::graph::DependencyGraph;
use crate::layout::{LayoutCalculator, Offset, TypeClass};
use crate::types::Schema;
use kissbuf_core::types::{PrimitiveType, TypeRegistry};
use std::collections::{BTreeSet, HashMap};

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// Aggregates in topological order (dependencies first).
    pub aggregates: Vec<ResolvedAggregate>,
    index: HashMap<String, usize>,
}

impl SchemaIr {
    /// Resolves a parsed schema.
    ///
    /// Builds the dependency graph, orders it, then lays out every aggregate
    /// in that order.
    ///
    /// # Arguments
    /// * `schema` - Parsed declarations
    /// * `registry` - Primitive types
    /// * `opaque_types` - Externally defined types copied with `sizeof`
    ///
    /// # Errors
    /// Returns `CyclicDependency` if aggregates embed each other and
    /// `UnknownType` if a field type resolves to nothing.
    pub fn resolve(
        schema: &Schema,
        registry: &TypeRegistry,
        opaque_types: &BTreeSet<String>,
    ) -> Result<Self, SchemaError> {
        let graph = DependencyGraph::build(schema)?;
        let order = graph.topological_order()?;
        let mut calc = LayoutCalculator::new(schema, registry, opaque_types);

        let mut ir = Self {
            aggregates: Vec::with_capacity(order.len()),
            index: HashMap::with_capacity(order.len()),
        };

        for name in &order {
            let Some(aggregate) = schema.get(name) else {
                return Err(SchemaError::TypeNotFound { name: name.clone() });
            };

            let mut offset = Offset::ZERO;
            let mut fields = Vec::with_capacity(aggregate.fields.len());
            for field in &aggregate.fields {
                let path = match calc.classify(&field.type_name) {
                    Some(TypeClass::Primitive(p)) => FieldPath::Primitive(p.clone()),
                    Some(TypeClass::Aggregate(a)) => FieldPath::Aggregate {
                        type_name: a.name.clone(),
                    },
                    Some(TypeClass::Opaque) => FieldPath::Opaque {
                        type_name: field.type_name.clone(),
                    },
                    None => {
                        return Err(SchemaError::UnknownType {
                            type_name: field.type_name.clone(),
                            field: field.name.clone(),
                            aggregate: aggregate.name.clone(),
                        });
                    }
                };
                let size = calc.size_of(&field.type_name)?;
                fields.push(ResolvedField {
                    name: field.name.clone(),
                    type_name: field.type_name.clone(),
                    offset: offset.clone(),
                    size: size.clone(),
                    path,
                });
                offset = offset + size;
            }

            tracing::debug!(name = %aggregate.name, size = %offset, "resolved layout");
            ir.index.insert(aggregate.name.clone(), ir.aggregates.len());
            ir.aggregates.push(ResolvedAggregate {
                name: aggregate.name.clone(),
                size: offset,
                fields,
                dependencies: graph
                    .dependencies(name)
                    .unwrap_or_default()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }

        Ok(ir)
    }

    /// Gets a resolved aggregate by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedAggregate> {
        self.index.get(name).map(|&idx| &self.aggregates[idx])
    }

    /// Returns aggregate names in topological order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.aggregates.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Resolved aggregate information.
#[derive(Debug, Clone)]
pub struct ResolvedAggregate {
    /// Aggregate name.
    pub name: String,
    /// Wire size in bytes.
    pub size: Offset,
    /// Fields in declaration order.
    pub fields: Vec<ResolvedField>,
    /// Aggregates embedded directly.
    pub dependencies: Vec<String>,
}

impl ResolvedAggregate {
    /// Returns the name of the generated encode function.
    #[must_use]
    pub fn serialize_fn(&self) -> String {
        serialize_fn_name(&self.name)
    }

    /// Returns the name of the generated decode function.
    #[must_use]
    pub fn deserialize_fn(&self) -> String {
        deserialize_fn_name(&self.name)
    }
}

/// Resolved field information.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Field name.
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Offset from the start of the enclosing aggregate.
    pub offset: Offset,
    /// Wire size of the field.
    pub size: Offset,
    /// How the field is encoded.
    pub path: FieldPath,
}

/// The codec path a field resolves through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    /// Registered primitive helper call.
    Primitive(PrimitiveType),
    /// Nested aggregate codec call.
    Aggregate {
        /// Nested aggregate name.
        type_name: String,
    },
    /// Raw `sizeof` copy of an externally defined type.
    Opaque {
        /// Opaque type name.
        type_name: String,
    },
}

/// Returns the generated encode function name for an aggregate.
#[must_use]
pub fn serialize_fn_name(aggregate: &str) -> String {
    format!("{aggregate}Serialize")
}

/// Returns the generated decode function name for an aggregate.
#[must_use]
pub fn deserialize_fn_name(aggregate: &str) -> String {
    format!("{aggregate}Deserialize")
}
