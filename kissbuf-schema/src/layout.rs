//! Byte layout calculation.
//!
//! Offsets and sizes are [`Offset`] values: a literal byte count while every
//! preceding field has a size known at generation time, and a symbolic
//! expression (`fixed + sizeof(T) + ...`) once an opaque type is involved.

use crate::error::SchemaError;
use crate::types::{AggregateType, Schema};
use kissbuf_core::types::{PrimitiveType, TypeRegistry};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::ops::Add;

/// A byte offset or size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Offset {
    /// Known at generation time.
    Literal(usize),
    /// `fixed` bytes plus `sizeof` of each opaque type, in field order.
    Symbolic {
        /// Literal part of the expression.
        fixed: usize,
        /// Types whose size only the target compiler knows.
        opaque: Vec<String>,
    },
}

impl Offset {
    /// Zero bytes.
    pub const ZERO: Self = Self::Literal(0);

    /// Size of a single opaque type.
    #[must_use]
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self::Symbolic {
            fixed: 0,
            opaque: vec![type_name.into()],
        }
    }

    /// Returns the byte count if it is known at generation time.
    #[must_use]
    pub const fn literal(&self) -> Option<usize> {
        match self {
            Self::Literal(n) => Some(*n),
            Self::Symbolic { .. } => None,
        }
    }

    /// Returns true if the value depends on an opaque type's size.
    #[must_use]
    pub const fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic { .. })
    }

    /// Renders the value as a C expression, parenthesized when compound.
    #[must_use]
    pub fn c_expr(&self) -> String {
        match self {
            Self::Literal(n) => n.to_string(),
            Self::Symbolic { fixed: 0, opaque } if opaque.len() == 1 => self.to_string(),
            Self::Symbolic { .. } => format!("({self})"),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Literal(a), Self::Literal(b)) => Self::Literal(a + b),
            (Self::Literal(a), Self::Symbolic { fixed, opaque })
            | (Self::Symbolic { fixed, opaque }, Self::Literal(a)) => Self::Symbolic {
                fixed: fixed + a,
                opaque,
            },
            (
                Self::Symbolic {
                    fixed: a,
                    opaque: mut lhs,
                },
                Self::Symbolic {
                    fixed: b,
                    opaque: rhs,
                },
            ) => {
                lhs.extend(rhs);
                Self::Symbolic {
                    fixed: a + b,
                    opaque: lhs,
                }
            }
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(n) => write!(f, "{n}"),
            Self::Symbolic { fixed, opaque } => {
                let mut terms: Vec<String> = Vec::with_capacity(opaque.len() + 1);
                if *fixed > 0 {
                    terms.push(fixed.to_string());
                }
                terms.extend(opaque.iter().map(|t| format!("sizeof({t})")));
                write!(f, "{}", terms.join(" + "))
            }
        }
    }
}

/// How a field type name resolves.
#[derive(Debug, Clone, Copy)]
pub enum TypeClass<'a> {
    /// Registered primitive.
    Primitive(&'a PrimitiveType),
    /// Declared aggregate.
    Aggregate(&'a AggregateType),
    /// Externally defined type copied as raw bytes.
    Opaque,
}

/// Computes wire sizes of aggregates.
///
/// Sizes are memoized for the lifetime of the calculator, which is created
/// per generation run.
#[derive(Debug)]
pub struct LayoutCalculator<'a> {
    schema: &'a Schema,
    registry: &'a TypeRegistry,
    opaque_types: &'a BTreeSet<String>,
    sizes: HashMap<String, Offset>,
    in_progress: HashSet<String>,
}

impl<'a> LayoutCalculator<'a> {
    /// Creates a calculator over one schema.
    ///
    /// # Arguments
    /// * `schema` - Parsed declarations
    /// * `registry` - Primitive types
    /// * `opaque_types` - Names allowed through as raw `sizeof` copies
    #[must_use]
    pub fn new(
        schema: &'a Schema,
        registry: &'a TypeRegistry,
        opaque_types: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            schema,
            registry,
            opaque_types,
            sizes: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Classifies a type name: registry first, then declared aggregates,
    /// then configured opaque types.
    #[must_use]
    pub fn classify(&self, type_name: &str) -> Option<TypeClass<'a>> {
        if let Some(primitive) = self.registry.get(type_name) {
            return Some(TypeClass::Primitive(primitive));
        }
        if let Some(aggregate) = self.schema.get(type_name) {
            return Some(TypeClass::Aggregate(aggregate));
        }
        if self.opaque_types.contains(type_name) {
            return Some(TypeClass::Opaque);
        }
        None
    }

    /// Returns the wire size of a primitive, aggregate or opaque type.
    ///
    /// # Errors
    /// Returns `TypeNotFound` if `type_name` resolves to nothing, and
    /// `UnknownType` if a nested field does.
    pub fn size_of(&mut self, type_name: &str) -> Result<Offset, SchemaError> {
        match self.classify(type_name) {
            Some(TypeClass::Primitive(p)) => Ok(Offset::Literal(p.byte_width)),
            Some(TypeClass::Aggregate(a)) => self.aggregate_size(a),
            Some(TypeClass::Opaque) => Ok(Offset::opaque(type_name)),
            None => Err(SchemaError::TypeNotFound {
                name: type_name.to_string(),
            }),
        }
    }

    fn aggregate_size(&mut self, aggregate: &'a AggregateType) -> Result<Offset, SchemaError> {
        if let Some(size) = self.sizes.get(&aggregate.name) {
            return Ok(size.clone());
        }
        if !self.in_progress.insert(aggregate.name.clone()) {
            return Err(SchemaError::cycle(&[aggregate.name.as_str()]));
        }

        let mut total = Offset::ZERO;
        for field in &aggregate.fields {
            let size = match self.classify(&field.type_name) {
                Some(_) => self.size_of(&field.type_name)?,
                None => {
                    return Err(SchemaError::UnknownType {
                        type_name: field.type_name.clone(),
                        field: field.name.clone(),
                        aggregate: aggregate.name.clone(),
                    });
                }
            };
            total = total + size;
        }

        self.in_progress.remove(&aggregate.name);
        self.sizes.insert(aggregate.name.clone(), total.clone());
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declarations;

    fn sizes(source: &str, opaque: &[&str]) -> Result<Vec<(String, Offset)>, SchemaError> {
        let schema = parse_declarations(source).expect("Failed to parse");
        let registry = TypeRegistry::standard();
        let opaque: BTreeSet<String> = opaque.iter().map(|s| s.to_string()).collect();
        let mut calc = LayoutCalculator::new(&schema, &registry, &opaque);
        schema
            .iter()
            .map(|a| calc.size_of(&a.name).map(|s| (a.name.clone(), s)))
            .collect()
    }

    #[test]
    fn test_point_size() {
        let result = sizes("typedef struct { int16_t x; int16_t y; } Point;", &[])
            .expect("Failed to size");
        assert_eq!(result[0].1, Offset::Literal(4));
    }

    #[test]
    fn test_segment_size() {
        let result = sizes(
            "typedef struct { int16_t x; int16_t y; } Point;\n\
             typedef struct { Point a; Point b; } Segment;",
            &[],
        )
        .expect("Failed to size");
        assert_eq!(result[1], ("Segment".to_string(), Offset::Literal(8)));
    }

    #[test]
    fn test_size_is_sum_of_field_sizes() {
        let source = "typedef struct { uint32_t foo; uint32_t noo; uint8_t baz; } FooStruct;\n\
                      typedef struct { float bar; uint8_t baz; } BarStruct;\n\
                      typedef struct { FooStruct foo; BarStruct bar; uint8_t baz; } NestedStruct;\n\
                      typedef struct { NestedStruct nested; FooStruct foo; } DoubleNestedStruct;";
        let schema = parse_declarations(source).expect("Failed to parse");
        let registry = TypeRegistry::standard();
        let opaque = BTreeSet::new();
        let mut calc = LayoutCalculator::new(&schema, &registry, &opaque);

        for aggregate in schema.iter() {
            let mut sum = Offset::ZERO;
            for field in &aggregate.fields {
                sum = sum + calc.size_of(&field.type_name).expect("Failed to size field");
            }
            assert_eq!(calc.size_of(&aggregate.name).expect("Failed to size"), sum);
        }
        assert_eq!(
            calc.size_of("DoubleNestedStruct").expect("Failed to size"),
            Offset::Literal(24)
        );
    }

    #[test]
    fn test_unknown_field_type() {
        let result = sizes("typedef struct { uint8_t a; Weird w; } Holder;", &[]);
        assert_eq!(
            result,
            Err(SchemaError::UnknownType {
                type_name: "Weird".to_string(),
                field: "w".to_string(),
                aggregate: "Holder".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_top_level_name() {
        let schema = Schema::new();
        let registry = TypeRegistry::standard();
        let opaque = BTreeSet::new();
        let mut calc = LayoutCalculator::new(&schema, &registry, &opaque);
        assert_eq!(
            calc.size_of("Missing"),
            Err(SchemaError::TypeNotFound {
                name: "Missing".to_string()
            })
        );
    }

    #[test]
    fn test_opaque_size_is_symbolic() {
        let result = sizes(
            "typedef struct { uint16_t a; struct_tm t; uint8_t b; } Stamp;\n\
             typedef struct { uint32_t id; Stamp s; } Event;",
            &["struct_tm"],
        )
        .expect("Failed to size");
        assert_eq!(
            result[0].1,
            Offset::Symbolic {
                fixed: 3,
                opaque: vec!["struct_tm".to_string()],
            }
        );
        assert_eq!(result[1].1.to_string(), "7 + sizeof(struct_tm)");
    }

    #[test]
    fn test_self_reference_does_not_recurse_forever() {
        let result = sizes("typedef struct { Node next; int32_t v; } Node;", &[]);
        assert!(matches!(result, Err(SchemaError::CyclicDependency { .. })));
    }

    #[test]
    fn test_offset_add() {
        let base = Offset::Literal(4) + Offset::Literal(2);
        assert_eq!(base, Offset::Literal(6));
        let sym = base + Offset::opaque("A") + Offset::Literal(1) + Offset::opaque("B");
        assert_eq!(
            sym,
            Offset::Symbolic {
                fixed: 7,
                opaque: vec!["A".to_string(), "B".to_string()],
            }
        );
        assert!(sym.literal().is_none());
    }

    #[test]
    fn test_offset_c_expr() {
        assert_eq!(Offset::Literal(12).c_expr(), "12");
        assert_eq!(Offset::opaque("T").c_expr(), "sizeof(T)");
        assert_eq!(
            (Offset::Literal(4) + Offset::opaque("T")).c_expr(),
            "(4 + sizeof(T))"
        );
    }
}
