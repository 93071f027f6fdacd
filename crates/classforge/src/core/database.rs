//! Core storage trait for diagram graphs
//!
//! Diagram graphs are cyclic (self references, bidirectional edges), so they
//! are stored flat: nodes in an id-indexed map, edges in an ordered sequence.
//! Nothing holds a reference to anything else; edges name their endpoints by id.

use anyhow::Result;

/// Core trait for diagram graph storage
///
/// Edge position is part of the contract: `edges()` must yield edges in
/// insertion order and `push_edge` returns the position used as the
/// ownership tie-break between bidirectional edges.
pub trait GraphStore: Send + Sync {
    /// The node type, looked up by string id
    type Node: Clone + Send + Sync;

    /// The edge type, addressed by position
    type Edge: Clone + Send + Sync;

    /// Insert a node; fails if its id is already present
    fn insert_node(&mut self, node: Self::Node) -> Result<()>;

    /// Append an edge and return its position
    fn push_edge(&mut self, edge: Self::Edge) -> usize;

    /// Get a node by id
    fn node(&self, id: &str) -> Option<&Self::Node>;

    /// Get an edge by position
    fn edge(&self, index: usize) -> Option<&Self::Edge>;

    /// Iterate over nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over edges in insertion order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Returns true if a node with this id exists
    fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Remove every node and edge
    fn clear(&mut self);

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}
