//! The dependency graph

use ahash::AHashMap;
use std::fmt;

/// An ordered map from source cell to the cells its formula reads
///
/// Nodes are canonical cell names (`'Sheet1'!A1`). Sources keep insertion
/// order and every source keeps its targets in the order they were found,
/// including repeats.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    entries: Vec<(String, Vec<String>)>,
    index: AHashMap<String, usize>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` reads every cell in `targets`
    ///
    /// Targets for a source already present are appended. An empty target
    /// list adds nothing, so no isolated source node appears.
    pub fn insert<I>(&mut self, source: String, targets: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut targets = targets.into_iter().peekable();
        if targets.peek().is_none() {
            return;
        }

        match self.index.get(&source).copied() {
            Some(i) => self.entries[i].1.extend(targets),
            None => {
                self.index.insert(source.clone(), self.entries.len());
                self.entries.push((source, targets.collect()));
            }
        }
    }

    /// Number of source nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of edges, counting repeats
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|(_, targets)| targets.len()).sum()
    }

    /// Targets of a source, if it has any
    pub fn targets(&self, source: &str) -> Option<&[String]> {
        self.index
            .get(source)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Iterate over sources and their targets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(source, targets)| (source.as_str(), targets.as_slice()))
    }

    /// Iterate over every edge in output order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(source, targets)| targets.iter().map(move |t| (source, t.as_str())))
    }
}

impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for DependencyGraph {}

impl FromIterator<(String, Vec<String>)> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(DependencyGraph::new(), |mut graph, (source, targets)| {
                graph.insert(source, targets);
                graph
            })
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::dot::write_dot(self, f)
    }
}
