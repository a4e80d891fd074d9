//! Dependency graph and topological ordering of aggregates.
//!
//! Edges point from an aggregate to the aggregates it embeds. The order
//! produced by [`DependencyGraph::topological_order`] places every
//! aggregate after all aggregates it embeds, so code generated in that order
//! only ever refers to functions emitted earlier.

use crate::error::SchemaError;
use crate::types::Schema;
use std::collections::VecDeque;

/// Direct embedding relation between declared aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Aggregate names in declaration order.
    nodes: Vec<String>,
    /// For each node, the indices of the aggregates it embeds (field order, no duplicates).
    dependencies: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Builds the graph from parsed declarations.
    ///
    /// Only field types that name another declared aggregate become edges;
    /// primitives and unknown names are ignored here.
    ///
    /// # Errors
    /// Returns `CyclicDependency` if an aggregate embeds itself.
    pub fn build(schema: &Schema) -> Result<Self, SchemaError> {
        let nodes: Vec<String> = schema.iter().map(|a| a.name.clone()).collect();
        let mut dependencies = Vec::with_capacity(nodes.len());

        for aggregate in schema.iter() {
            let mut deps: Vec<usize> = Vec::new();
            for field in &aggregate.fields {
                if field.type_name == aggregate.name {
                    return Err(SchemaError::cycle(&[aggregate.name.as_str()]));
                }
                if let Some(idx) = schema.index_of(&field.type_name) {
                    if !deps.contains(&idx) {
                        deps.push(idx);
                    }
                }
            }
            dependencies.push(deps);
        }

        Ok(Self {
            nodes,
            dependencies,
        })
    }

    /// Returns the aggregate names in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Returns the aggregates directly embedded by `name`, in field order.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.nodes.iter().position(|n| n == name)?;
        Some(
            self.dependencies[idx]
                .iter()
                .map(|&d| self.nodes[d].as_str())
                .collect(),
        )
    }

    /// Linearizes the aggregates so that dependencies precede dependents.
    ///
    /// Uses Kahn's algorithm with a FIFO queue seeded in declaration order,
    /// so identical input always yields the identical order.
    ///
    /// # Errors
    /// Returns `CyclicDependency` naming one cycle if not every node can be ordered.
    pub fn topological_order(&self) -> Result<Vec<String>, SchemaError> {
        let count = self.nodes.len();
        let mut unresolved: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (node, deps) in self.dependencies.iter().enumerate() {
            for &dep in deps {
                dependents[dep].push(node);
            }
        }

        let mut queue: VecDeque<usize> = (0..count).filter(|&n| unresolved[n] == 0).collect();
        let mut order = Vec::with_capacity(count);

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &dependent in &dependents[node] {
                unresolved[dependent] -= 1;
                if unresolved[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() < count {
            return Err(self.find_cycle(&unresolved));
        }

        let order: Vec<String> = order.into_iter().map(|n| self.nodes[n].clone()).collect();
        tracing::debug!(order = ?order, "resolved topological order");
        Ok(order)
    }

    /// Walks unresolved dependencies from the first unresolved node until a
    /// node repeats; the repeated suffix of the walk is a cycle.
    fn find_cycle(&self, unresolved: &[usize]) -> SchemaError {
        let Some(start) = (0..self.nodes.len()).find(|&n| unresolved[n] > 0) else {
            return SchemaError::CyclicDependency {
                path: String::new(),
            };
        };

        let mut walk: Vec<usize> = vec![start];
        let mut current = start;
        loop {
            // every node with unresolved > 0 embeds at least one unresolved node
            let Some(&next) = self.dependencies[current]
                .iter()
                .find(|&&d| unresolved[d] > 0)
            else {
                break;
            };
            if let Some(pos) = walk.iter().position(|&n| n == next) {
                let cycle: Vec<&str> = walk[pos..].iter().map(|&n| self.nodes[n].as_str()).collect();
                return SchemaError::cycle(&cycle);
            }
            walk.push(next);
            current = next;
        }

        let names: Vec<&str> = walk.iter().map(|&n| self.nodes[n].as_str()).collect();
        SchemaError::CyclicDependency {
            path: names.join(" -> "),
        }
    }
}
