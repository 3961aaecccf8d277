use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use crate::graph::PropertyGraph;

/// Reference graph among properties.
///
/// Edge semantics: if `A -> B` exists, the value of A references B, so B must
/// be evaluated before A. Nodes are kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    /// Key: referencing property, Value: referenced properties in order of appearance
    edges: IndexMap<String, IndexSet<String>>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the reference graph of every property in `graph`.
    pub fn from_properties(graph: &PropertyGraph) -> Self {
        let mut deps = Self::new();
        for property in graph.iter() {
            deps.add_node(&property.name);
            for reference in property.value.references() {
                deps.add_edge(&property.name, reference);
            }
        }
        deps
    }

    pub fn add_node(&mut self, node: &str) {
        if !self.edges.contains_key(node) {
            self.edges.insert(node.to_string(), IndexSet::new());
        }
    }

    /// Add a dependency edge: `from` references `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from);
        if let Some(targets) = self.edges.get_mut(from) {
            targets.insert(to.to_string());
        }
    }

    /// Direct references of a node.
    pub fn references(&self, node: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// Nodes in insertion (declaration) order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|s| s.len()).sum()
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Evaluation order: every node comes after the nodes it references, and
    /// among nodes that are ready at the same time the earlier-declared one
    /// goes first. Returns `None` if the graph has a cycle or an edge to an
    /// unknown node.
    pub fn topological_order(&self) -> Option<Vec<&str>> {
        let mut pending: Vec<usize> = Vec::with_capacity(self.edges.len());
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.edges.len()];

        for (index, targets) in self.edges.values().enumerate() {
            pending.push(targets.len());
            for target in targets {
                dependents[self.edges.get_index_of(target)?].push(index);
            }
        }

        let mut ready: BTreeSet<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(index, _)| index)
            .collect();
        let mut order = Vec::with_capacity(self.edges.len());

        while let Some(index) = ready.pop_first() {
            let (name, _) = self.edges.get_index(index)?;
            order.push(name.as_str());
            for &dependent in &dependents[index] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        (order.len() == self.edges.len()).then_some(order)
    }
}
