//! Dependency graph engine.
//!
//! Nodes are the session's variables, edges are accepted dependencies. Every
//! mutation keeps three things in lockstep: the variable list, the dependency
//! list (insertion-ordered, used for display and export) and the petgraph
//! structure used for cycle checks. The graph is acyclic after every call.

use std::collections::{HashMap, HashSet};

use dagform_common::Dependency;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::error::{GraphError, Result};

/// Result of an edge insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Edge inserted and appended to the dependency list.
    Accepted,
    /// Edge was already accepted earlier; nothing changed.
    AlreadyPresent,
    /// Edge would close a cycle and was rolled back.
    RejectedCycle,
}

impl AddOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, AddOutcome::RejectedCycle)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    variables: Vec<String>,
    dependencies: Vec<Dependency>,
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph seeded with `variables` and no edges.
    pub fn with_variables<I, S>(variables: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        graph.set_variables(variables)?;
        Ok(graph)
    }

    /// Replace the node set with `variables`, discarding every edge.
    ///
    /// Names are trimmed; blank or repeated names are rejected and leave the
    /// current graph untouched.
    pub fn set_variables<I, S>(&mut self, variables: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        for raw in variables {
            let name = raw.into().trim().to_string();
            if name.is_empty() {
                return Err(GraphError::EmptyVariable);
            }
            if !seen.insert(name.clone()) {
                return Err(GraphError::DuplicateVariable(name));
            }
            names.push(name);
        }

        let mut graph = DiGraph::with_capacity(names.len(), 0);
        let mut index = HashMap::with_capacity(names.len());
        for name in &names {
            let idx = graph.add_node(name.clone());
            index.insert(name.clone(), idx);
        }

        debug!(variables = names.len(), "graph reset");
        self.variables = names;
        self.dependencies.clear();
        self.graph = graph;
        self.index = index;
        Ok(())
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Accepted dependencies in acceptance order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_dependency(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&s), Some(&t)) => self.graph.find_edge(s, t).is_some(),
            _ => false,
        }
    }

    /// Every ordered pair of distinct variables that is not yet an accepted
    /// dependency. Outer loop over sources, inner over targets, both in
    /// variable-list order.
    pub fn candidate_pairs(&self) -> Vec<Dependency> {
        let accepted: HashSet<(&str, &str)> = self
            .dependencies
            .iter()
            .map(|d| (d.source.as_str(), d.target.as_str()))
            .collect();

        let mut pairs = Vec::new();
        for source in &self.variables {
            for target in &self.variables {
                if source == target || accepted.contains(&(source.as_str(), target.as_str())) {
                    continue;
                }
                pairs.push(Dependency::new(source.clone(), target.clone()));
            }
        }
        pairs
    }

    /// Insert `source -> target` unless it would close a cycle anywhere in
    /// the graph. A self-pair is a cycle of length one.
    pub fn add_dependency(&mut self, source: &str, target: &str) -> Result<AddOutcome> {
        let s = self.node(source)?;
        let t = self.node(target)?;

        if s == t {
            return Ok(AddOutcome::RejectedCycle);
        }
        if self.graph.find_edge(s, t).is_some() {
            return Ok(AddOutcome::AlreadyPresent);
        }

        let edge = self.graph.add_edge(s, t, ());
        if is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            debug!(from = source, to = target, "dependency rejected: cycle");
            return Ok(AddOutcome::RejectedCycle);
        }

        self.dependencies.push(Dependency::new(source, target));
        Ok(AddOutcome::Accepted)
    }

    pub fn remove_dependency(&mut self, source: &str, target: &str) -> Result<()> {
        let not_found = || GraphError::DependencyNotFound {
            from: source.to_string(),
            to: target.to_string(),
        };
        let (s, t) = match (self.index.get(source), self.index.get(target)) {
            (Some(&s), Some(&t)) => (s, t),
            _ => return Err(not_found()),
        };
        let edge = self.graph.find_edge(s, t).ok_or_else(not_found)?;

        self.graph.remove_edge(edge);
        self.dependencies.retain(|d| !d.matches(source, target));
        Ok(())
    }

    /// Edges as stored in the graph structure, in no particular order.
    pub fn edges(&self) -> Vec<Dependency> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(s, t)| Dependency::new(self.graph[s].clone(), self.graph[t].clone()))
            .collect()
    }

    /// Edges as `(source, target)` positions into `variables()`.
    pub fn edge_positions(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(s, t)| (s.index(), t.index()))
            .collect()
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Variables ordered so that every source precedes its targets.
    pub fn topological_order(&self) -> Vec<&str> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().map(|idx| self.graph[idx].as_str()).collect(),
            // unreachable while the acyclic invariant holds
            Err(_) => self.variables.iter().map(String::as_str).collect(),
        }
    }

    fn node(&self, name: &str) -> Result<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownVariable(name.to_string()))
    }
}
