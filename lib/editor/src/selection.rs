//! Canvas selection.
//!
//! Node and edge selections are ordered and duplicate-free. The store prunes
//! them whenever the graph loses nodes or edges, so a selection never refers
//! to something that is not on the canvas.

use flowcanvas_core::{EdgeId, NodeId};
use flowcanvas_workflow::WorkflowGraph;
use std::collections::HashSet;

/// Currently selected nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

impl SelectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected node IDs in selection order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Selected edge IDs in selection order.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    #[must_use]
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains(&node_id)
    }

    #[must_use]
    pub fn contains_edge(&self, edge_id: EdgeId) -> bool {
        self.edges.contains(&edge_id)
    }

    /// Selects `ids`.
    ///
    /// A non-additive select replaces the whole selection, edges included.
    pub fn select(&mut self, ids: impl IntoIterator<Item = NodeId>, additive: bool) {
        if !additive {
            self.nodes.clear();
            self.edges.clear();
        }
        for id in ids {
            if !self.nodes.contains(&id) {
                self.nodes.push(id);
            }
        }
    }

    /// Flips membership of one node, leaving the rest of the selection alone.
    pub fn toggle(&mut self, node_id: NodeId) {
        if let Some(index) = self.nodes.iter().position(|id| *id == node_id) {
            self.nodes.remove(index);
        } else {
            self.nodes.push(node_id);
        }
    }

    /// Selects one edge. An additive click toggles it instead.
    pub fn select_edge(&mut self, edge_id: EdgeId, additive: bool) {
        if additive {
            if let Some(index) = self.edges.iter().position(|id| *id == edge_id) {
                self.edges.remove(index);
            } else {
                self.edges.push(edge_id);
            }
        } else {
            self.nodes.clear();
            self.edges = vec![edge_id];
        }
    }

    /// Selects every node and edge in `graph`.
    pub fn select_all(&mut self, graph: &WorkflowGraph) {
        self.nodes = graph.nodes().iter().map(|n| n.id).collect();
        self.edges = graph.edges().iter().map(|e| e.id).collect();
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Drops the given nodes from the selection.
    pub fn remove_nodes(&mut self, ids: &HashSet<NodeId>) {
        self.nodes.retain(|id| !ids.contains(id));
    }

    /// Drops the given edges from the selection.
    pub fn remove_edges(&mut self, ids: &HashSet<EdgeId>) {
        self.edges.retain(|id| !ids.contains(id));
    }

    /// Drops every ID that no longer exists in `graph`.
    ///
    /// Returns true if anything was dropped.
    pub fn prune(&mut self, graph: &WorkflowGraph) -> bool {
        let before = (self.nodes.len(), self.edges.len());
        self.nodes.retain(|id| graph.contains_node(*id));
        self.edges.retain(|id| graph.contains_edge(*id));
        before != (self.nodes.len(), self.edges.len())
    }
}
