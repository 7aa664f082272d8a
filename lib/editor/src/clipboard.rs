//! Copy and paste of node selections.
//!
//! The clipboard holds a detached copy of the selected nodes and the edges
//! running between them. Pasting instantiates that copy with fresh IDs, so the
//! same contents can be pasted any number of times.

use flowcanvas_core::{IdGenerator, NodeId};
use flowcanvas_workflow::{Edge, Node, Position, WorkflowGraph};
use std::collections::{HashMap, HashSet};

/// Nodes and edges ready to be committed to the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Session clipboard.
#[derive(Debug, Clone, Default)]
pub struct ClipboardManager {
    contents: Fragment,
}

impl ClipboardManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.nodes.is_empty()
    }

    /// The copied nodes, as they were when copied.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.contents.nodes
    }

    /// The copied edges; both endpoints of each are among the copied nodes.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.contents.edges
    }

    /// Replaces the clipboard with the given nodes of `graph`.
    ///
    /// Only edges with both endpoints selected are kept. A node whose group is
    /// not copied along with it is detached and keeps its canvas position.
    /// Copying nothing leaves the clipboard untouched. Returns the number of
    /// nodes copied.
    pub fn copy(&mut self, graph: &WorkflowGraph, ids: &[NodeId]) -> usize {
        let wanted: HashSet<NodeId> = ids.iter().copied().collect();
        let nodes: Vec<Node> = graph
            .nodes()
            .iter()
            .filter(|node| wanted.contains(&node.id))
            .map(|node| {
                let mut copy = node.clone();
                if let Some(parent_id) = copy.parent_id
                    && !wanted.contains(&parent_id)
                {
                    copy.position = graph.absolute_position(node.id).unwrap_or(copy.position);
                    copy.parent_id = None;
                    copy.hidden = false;
                }
                copy
            })
            .collect();
        if nodes.is_empty() {
            return 0;
        }

        let edges = graph
            .edges()
            .iter()
            .filter(|edge| wanted.contains(&edge.source) && wanted.contains(&edge.target))
            .cloned()
            .collect();

        let count = nodes.len();
        self.contents = Fragment { nodes, edges };
        count
    }

    /// Builds a fresh instance of the clipboard contents.
    ///
    /// Every node and edge gets a new ID, internal references are remapped,
    /// and top-level nodes are shifted by `offset`. Children of a copied
    /// group keep their position relative to it.
    pub fn instantiate(&self, ids: &mut IdGenerator, offset: Position) -> Fragment {
        let mapping: HashMap<NodeId, NodeId> = self
            .contents
            .nodes
            .iter()
            .map(|node| (node.id, ids.node_id()))
            .collect();

        let nodes = self
            .contents
            .nodes
            .iter()
            .filter_map(|node| {
                let mut fresh = node.clone();
                fresh.id = *mapping.get(&node.id)?;
                fresh.parent_id = node.parent_id.and_then(|p| mapping.get(&p).copied());
                if fresh.parent_id.is_none() {
                    fresh.position = node.position.offset(offset);
                }
                Some(fresh)
            })
            .collect();

        let edges = self
            .contents
            .edges
            .iter()
            .filter_map(|edge| {
                let mut fresh = edge.clone();
                fresh.id = ids.edge_id();
                fresh.source = *mapping.get(&edge.source)?;
                fresh.target = *mapping.get(&edge.target)?;
                Some(fresh)
            })
            .collect();

        Fragment { nodes, edges }
    }

    pub fn clear(&mut self) {
        self.contents = Fragment::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcanvas_core::EdgeId;
    use flowcanvas_workflow::{Connection, NodeKind};

    fn sample() -> (WorkflowGraph, Vec<NodeId>) {
        let a = Node::new(NodeKind::Start, Position::new(0.0, 0.0));
        let b = Node::new(NodeKind::Code, Position::new(300.0, 0.0));
        let c = Node::new(NodeKind::End, Position::new(600.0, 0.0));
        let ids = vec![a.id, b.id, c.id];
        let edges = vec![
            Edge::new(EdgeId::new(), Connection::new(a.id, "output", b.id, "input")),
            Edge::new(EdgeId::new(), Connection::new(b.id, "output", c.id, "input")),
        ];
        (WorkflowGraph::from_parts(vec![a, b, c], edges), ids)
    }

    #[test]
    fn copy_keeps_only_internal_edges() {
        let (graph, ids) = sample();
        let mut clipboard = ClipboardManager::new();
        assert_eq!(clipboard.copy(&graph, &ids[..2]), 2);
        assert_eq!(clipboard.edges().len(), 1);
        assert_eq!(clipboard.edges()[0].target, ids[1]);
    }

    #[test]
    fn copy_of_nothing_keeps_previous_contents() {
        let (graph, ids) = sample();
        let mut clipboard = ClipboardManager::new();
        clipboard.copy(&graph, &ids);
        assert_eq!(clipboard.copy(&graph, &[NodeId::new()]), 0);
        assert_eq!(clipboard.nodes().len(), 3);
    }

    #[test]
    fn instantiate_remaps_everything() {
        let (graph, ids) = sample();
        let mut clipboard = ClipboardManager::new();
        clipboard.copy(&graph, &ids);

        let mut generator = IdGenerator::new();
        let fragment = clipboard.instantiate(&mut generator, Position::new(50.0, 50.0));
        let fresh: HashSet<NodeId> = fragment.nodes.iter().map(|n| n.id).collect();

        assert_eq!(fresh.len(), 3);
        assert!(ids.iter().all(|id| !fresh.contains(id)));
        assert!(fragment
            .edges
            .iter()
            .all(|e| fresh.contains(&e.source) && fresh.contains(&e.target)));
        assert_eq!(fragment.nodes[1].position, Position::new(350.0, 50.0));
    }

    #[test]
    fn repeated_instances_never_collide() {
        let (graph, ids) = sample();
        let mut clipboard = ClipboardManager::new();
        clipboard.copy(&graph, &ids);

        let mut generator = IdGenerator::new();
        let first = clipboard.instantiate(&mut generator, Position::default());
        let second = clipboard.instantiate(&mut generator, Position::default());
        let all: HashSet<NodeId> = first.nodes.iter().chain(&second.nodes).map(|n| n.id).collect();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn orphaned_child_is_detached() {
        let group = Node::new(NodeKind::Group, Position::new(100.0, 100.0));
        let mut child = Node::new(NodeKind::Code, Position::new(40.0, 80.0));
        child.parent_id = Some(group.id);
        let child_id = child.id;
        let graph = WorkflowGraph::from_parts(vec![group, child], vec![]);

        let mut clipboard = ClipboardManager::new();
        clipboard.copy(&graph, &[child_id]);
        let copied = &clipboard.nodes()[0];
        assert_eq!(copied.parent_id, None);
        assert_eq!(copied.position, Position::new(140.0, 180.0));
    }

    #[test]
    fn copied_group_keeps_children_relative() {
        let group = Node::new(NodeKind::Group, Position::new(100.0, 100.0));
        let mut child = Node::new(NodeKind::Code, Position::new(40.0, 80.0));
        child.parent_id = Some(group.id);
        let ids = [group.id, child.id];
        let graph = WorkflowGraph::from_parts(vec![group, child], vec![]);

        let mut clipboard = ClipboardManager::new();
        clipboard.copy(&graph, &ids);
        let fragment = clipboard.instantiate(&mut IdGenerator::new(), Position::new(50.0, 50.0));

        assert_eq!(fragment.nodes[0].position, Position::new(150.0, 150.0));
        assert_eq!(fragment.nodes[1].parent_id, Some(fragment.nodes[0].id));
        assert_eq!(fragment.nodes[1].position, Position::new(40.0, 80.0));
    }
}
