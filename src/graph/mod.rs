//! Graph model for library linkage.
//!
//! Nodes live in an arena keyed by their path (see `resolver::Resolver`);
//! edges are ordered `(parent, child)` path pairs collected into a
//! `BTreeSet`, so duplicates collapse and iteration order is stable.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod resolver;

/// A library (or input binary) in the resolution arena.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryNode {
    /// Resolved path, or the bare library name when resolution failed.
    pub path: String,
    /// Zero for roots.
    pub depth: usize,
    /// Path of the node that first introduced this one.
    pub parent: Option<String>,
    /// Child paths in declaration order, without duplicates.
    pub children: Vec<String>,
}

impl LibraryNode {
    #[must_use]
    pub fn new(path: impl Into<String>, depth: usize, parent: Option<String>) -> Self {
        Self { path: path.into(), depth, parent, children: Vec::new() }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyEdge {
    pub parent: String,
    pub child: String,
}

impl DependencyEdge {
    #[must_use]
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self { parent: parent.into(), child: child.into() }
    }
}

pub type EdgeSet = BTreeSet<DependencyEdge>;

/// Distinct endpoints of `edges`, sorted.
#[must_use]
pub fn nodes_of(edges: &EdgeSet) -> BTreeSet<&str> {
    let mut out = BTreeSet::new();
    for e in edges {
        out.insert(e.parent.as_str());
        out.insert(e.child.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_set_collapses_duplicates() {
        let mut edges = EdgeSet::new();
        edges.insert(DependencyEdge::new("a", "b"));
        edges.insert(DependencyEdge::new("a", "b"));
        edges.insert(DependencyEdge::new("b", "c"));
        assert_eq!(edges.len(), 2);
        let nodes: Vec<_> = nodes_of(&edges).into_iter().collect();
        assert_eq!(nodes, vec!["a", "b", "c"]);
    }

    #[test]
    fn root_has_no_parent() {
        assert!(LibraryNode::new("/bin/app", 0, None).is_root());
        assert!(!LibraryNode::new("/lib/x.so", 1, Some("/bin/app".into())).is_root());
    }
}
