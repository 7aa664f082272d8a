//! Workflow graph snapshot.
//!
//! Workflows are directed graphs where:
//! - Nodes are workflow steps with typed ports
//! - Edges connect output ports to input ports
//!
//! Nodes are kept in insertion order, which is also the canvas stacking
//! order. Reachability questions are answered through a petgraph view built
//! from the edge list.

use crate::edge::Edge;
use crate::error::GraphError;
use crate::node::{Node, Position};
use crate::validator::{ConnectionValidator, Verdict};
use flowcanvas_core::{EdgeId, NodeId};
use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An owned snapshot of the nodes and edges on the canvas.
///
/// Two snapshots are equal when every node and edge is deep-equal and in the
/// same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl WorkflowGraph {
    /// Creates a new empty workflow graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a snapshot from parts without validating it.
    ///
    /// Use [`WorkflowGraph::validate`] before trusting foreign input.
    #[must_use]
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Returns all nodes in stacking order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns all edges.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a reference to a node by its ID.
    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// Returns a mutable reference to a node by its ID.
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    /// Returns a reference to an edge by its ID.
    #[must_use]
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    /// Returns true if a node with the given ID exists.
    #[must_use]
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// Returns true if an edge with the given ID exists.
    #[must_use]
    pub fn contains_edge(&self, edge_id: EdgeId) -> bool {
        self.edge(edge_id).is_some()
    }

    /// Appends a node on top of the stacking order.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Inserts a node at the bottom of the stacking order.
    pub fn push_node_back(&mut self, node: Node) {
        self.nodes.insert(0, node);
    }

    /// Appends an edge.
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Mutable access to every node, for bulk position and visibility updates.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Replaces the node list, dropping every edge left without an endpoint.
    ///
    /// Returns the IDs of the dropped edges.
    pub fn replace_nodes(&mut self, nodes: Vec<Node>) -> Vec<EdgeId> {
        self.nodes = nodes;
        let live: HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        let mut dropped = Vec::new();
        self.edges.retain(|edge| {
            let keep = live.contains(&edge.source) && live.contains(&edge.target);
            if !keep {
                dropped.push(edge.id);
            }
            keep
        });
        dropped
    }

    /// Replaces the edge list.
    pub fn replace_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Removes the given nodes and every edge with an endpoint among them.
    ///
    /// Returns the removed nodes and the IDs of the removed edges.
    pub fn remove_nodes(&mut self, ids: &HashSet<NodeId>) -> (Vec<Node>, Vec<EdgeId>) {
        let (removed, kept): (Vec<Node>, Vec<Node>) = std::mem::take(&mut self.nodes)
            .into_iter()
            .partition(|node| ids.contains(&node.id));
        self.nodes = kept;

        let mut dropped = Vec::new();
        self.edges.retain(|edge| {
            let keep = !ids.contains(&edge.source) && !ids.contains(&edge.target);
            if !keep {
                dropped.push(edge.id);
            }
            keep
        });
        (removed, dropped)
    }

    /// Removes the given edges, returning the removed ones.
    pub fn remove_edges(&mut self, ids: &HashSet<EdgeId>) -> Vec<Edge> {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|edge| ids.contains(&edge.id));
        self.edges = kept;
        removed
    }

    /// Returns the successors (downstream nodes) of a given node.
    pub fn successors(&self, node_id: NodeId) -> Vec<(&Node, &Edge)> {
        self.edges
            .iter()
            .filter(|edge| edge.source == node_id)
            .filter_map(|edge| Some((self.node(edge.target)?, edge)))
            .collect()
    }

    /// Returns the direct children of a group node.
    pub fn children_of(&self, group_id: NodeId) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|node| node.parent_id == Some(group_id))
            .collect()
    }

    /// Returns the position of a node in canvas coordinates, resolving parent groups.
    #[must_use]
    pub fn absolute_position(&self, node_id: NodeId) -> Option<Position> {
        let mut node = self.node(node_id)?;
        let mut position = node.position;
        let mut seen = HashSet::from([node_id]);
        while let Some(parent_id) = node.parent_id {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.node(parent_id) else {
                break;
            };
            position = position.offset(parent.position);
            node = parent;
        }
        Some(position)
    }

    /// Builds a petgraph view with one vertex per node and one arc per edge.
    #[must_use]
    pub fn dependency_graph(&self) -> DiGraphMap<NodeId, ()> {
        let mut graph = DiGraphMap::with_capacity(self.nodes.len(), self.edges.len());
        for node in &self.nodes {
            graph.add_node(node.id);
        }
        for edge in &self.edges {
            graph.add_edge(edge.source, edge.target, ());
        }
        graph
    }

    /// Returns true if a directed path leads from `from` to `to`.
    #[must_use]
    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        let graph = self.dependency_graph();
        if !graph.contains_node(from) || !graph.contains_node(to) {
            return false;
        }
        has_path_connecting(&graph, from, to, None)
    }

    /// Returns true if the edge set contains a directed cycle.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.dependency_graph())
    }

    /// Returns nodes that have no incoming edges (entry points).
    pub fn entry_nodes(&self) -> Vec<&Node> {
        let graph = self.dependency_graph();
        self.nodes
            .iter()
            .filter(|n| {
                graph
                    .neighbors_directed(n.id, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect()
    }

    /// Validates every structural invariant of the snapshot.
    ///
    /// Checks:
    /// - Node and edge IDs are unique
    /// - Every parent reference points at a group node
    /// - Every edge passes the connection rules against the edges before it
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen_nodes = HashSet::new();
        for node in &self.nodes {
            if !seen_nodes.insert(node.id) {
                return Err(GraphError::DuplicateNode { node_id: node.id });
            }
        }

        for node in &self.nodes {
            if let Some(parent_id) = node.parent_id
                && !self.node(parent_id).is_some_and(Node::is_group)
            {
                return Err(GraphError::InvalidParent {
                    node_id: node.id,
                    parent_id,
                });
            }
        }

        // Replaying the edges one by one checks self-loops, endpoints,
        // acyclicity, types, and arity with the same rules as interactive edits.
        let mut replay = Self::from_parts(self.nodes.clone(), Vec::with_capacity(self.edges.len()));
        let mut seen_edges = HashSet::new();
        for edge in &self.edges {
            if !seen_edges.insert(edge.id) {
                return Err(GraphError::DuplicateEdge { edge_id: edge.id });
            }
            if let Verdict::Rejected(rejection) =
                ConnectionValidator::check(&replay, &edge.connection())
            {
                return Err(GraphError::EdgeRejected {
                    edge_id: edge.id,
                    rejection,
                });
            }
            replay.push_edge(edge.clone());
        }

        Ok(())
    }

    /// Lists required input ports that have no incoming edge.
    ///
    /// This is advisory: a graph being edited routinely has unconnected
    /// inputs, so the editor never refuses a mutation because of it.
    pub fn missing_required_inputs(&self) -> Vec<GraphError> {
        let mut missing = Vec::new();
        for node in &self.nodes {
            for input in node.data.inputs.iter().filter(|p| p.required) {
                let connected = self
                    .edges
                    .iter()
                    .any(|edge| edge.ends_at(node.id, Some(input.id.as_str())));
                if !connected {
                    missing.push(GraphError::RequiredInputMissing {
                        node_id: node.id,
                        port: input.id.clone(),
                    });
                }
            }
        }
        missing
    }
}
