//! Layered auto-layout.
//!
//! Top-level nodes are assigned to layers by longest path from the entry
//! nodes, then laid out layer by layer. Members of a group move with their
//! group, so edges touching a member count as edges of the group.

use crate::config::LayoutConfig;
use flowcanvas_core::NodeId;
use flowcanvas_workflow::{Position, WorkflowGraph};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Direction in which layers advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

impl FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" | "lr" => Ok(Self::Horizontal),
            "vertical" | "tb" => Ok(Self::Vertical),
            other => Err(format!("unknown layout direction '{other}'")),
        }
    }
}

fn top_level_of(graph: &WorkflowGraph, mut node_id: NodeId) -> Option<NodeId> {
    let mut hops = 0;
    loop {
        let node = graph.node(node_id)?;
        match node.parent_id {
            Some(parent_id) if hops < graph.node_count() => {
                node_id = parent_id;
                hops += 1;
            }
            _ => return Some(node_id),
        }
    }
}

/// Returns the layer index of every top-level node.
#[must_use]
pub fn assign_layers(graph: &WorkflowGraph) -> HashMap<NodeId, usize> {
    let mut dag: DiGraphMap<NodeId, ()> = DiGraphMap::new();
    for node in graph.nodes().iter().filter(|n| n.parent_id.is_none()) {
        dag.add_node(node.id);
    }
    for edge in graph.edges() {
        let (Some(source), Some(target)) = (
            top_level_of(graph, edge.source),
            top_level_of(graph, edge.target),
        ) else {
            continue;
        };
        if source != target {
            dag.add_edge(source, target, ());
        }
    }

    // Folding members into their groups can close a loop; insertion order
    // then stands in for a topological order and back edges are ignored.
    let order = toposort(&dag, None).unwrap_or_else(|_| dag.nodes().collect());
    let rank: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut layers: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());
    for node_id in &order {
        let layer = dag
            .neighbors_directed(*node_id, petgraph::Direction::Incoming)
            .filter(|pred| rank[pred] < rank[node_id])
            .filter_map(|pred| layers.get(&pred).map(|l| l + 1))
            .max()
            .unwrap_or(0);
        layers.insert(*node_id, layer);
    }
    layers
}

/// Computes new positions for every top-level node.
///
/// Within a layer, nodes keep their topological order.
#[must_use]
pub fn compute_layout(
    graph: &WorkflowGraph,
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> Vec<(NodeId, Position)> {
    let layers = assign_layers(graph);
    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut positions = Vec::with_capacity(layers.len());

    for node in graph.nodes().iter().filter(|n| n.parent_id.is_none()) {
        let Some(&layer) = layers.get(&node.id) else {
            continue;
        };
        let slot = slots.entry(layer).or_insert(0);
        let along = config.layer_spacing * layer as f64;
        let across = config.node_spacing * *slot as f64;
        *slot += 1;

        let position = match direction {
            LayoutDirection::Horizontal => {
                Position::new(config.origin.x + along, config.origin.y + across)
            }
            LayoutDirection::Vertical => {
                Position::new(config.origin.x + across, config.origin.y + along)
            }
        };
        positions.push((node.id, position));
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcanvas_core::EdgeId;
    use flowcanvas_workflow::{Connection, Edge, Node, NodeKind};

    fn diamond() -> (WorkflowGraph, [NodeId; 4]) {
        let start = Node::new(NodeKind::Start, Position::default());
        let left = Node::new(NodeKind::Code, Position::default());
        let right = Node::new(NodeKind::Http, Position::default());
        let end = Node::new(NodeKind::Code, Position::default());
        let ids = [start.id, left.id, right.id, end.id];
        let edges = vec![
            Edge::new(EdgeId::new(), Connection::new(ids[0], "output", ids[1], "input")),
            Edge::new(EdgeId::new(), Connection::new(ids[0], "output", ids[2], "input")),
            Edge::new(EdgeId::new(), Connection::new(ids[1], "output", ids[3], "input")),
            Edge::new(EdgeId::new(), Connection::untyped(ids[2], ids[3])),
        ];
        (WorkflowGraph::from_parts(vec![start, left, right, end], edges), ids)
    }

    #[test]
    fn layers_follow_longest_path() {
        let (graph, ids) = diamond();
        let layers = assign_layers(&graph);
        assert_eq!(layers[&ids[0]], 0);
        assert_eq!(layers[&ids[1]], 1);
        assert_eq!(layers[&ids[2]], 1);
        assert_eq!(layers[&ids[3]], 2);
    }

    #[test]
    fn horizontal_layout_advances_x() {
        let (graph, ids) = diamond();
        let config = LayoutConfig::default();
        let positions: HashMap<_, _> = compute_layout(&graph, LayoutDirection::Horizontal, &config)
            .into_iter()
            .collect();

        assert_eq!(positions[&ids[0]], config.origin);
        assert_eq!(positions[&ids[3]].x, config.origin.x + 2.0 * config.layer_spacing);
        assert_ne!(positions[&ids[1]].y, positions[&ids[2]].y);
    }

    #[test]
    fn vertical_layout_advances_y() {
        let (graph, ids) = diamond();
        let config = LayoutConfig::default();
        let positions: HashMap<_, _> = compute_layout(&graph, LayoutDirection::Vertical, &config)
            .into_iter()
            .collect();

        assert_eq!(positions[&ids[3]].y, config.origin.y + 2.0 * config.layer_spacing);
        assert_eq!(positions[&ids[0]].x, config.origin.x);
    }

    #[test]
    fn members_are_not_positioned() {
        let (mut graph, ids) = diamond();
        let group = Node::new(NodeKind::Group, Position::default());
        let group_id = group.id;
        graph.push_node_back(group);
        if let Some(node) = graph.node_mut(ids[3]) {
            node.parent_id = Some(group_id);
        }

        let layers = assign_layers(&graph);
        assert!(!layers.contains_key(&ids[3]));
        assert_eq!(layers[&group_id], 2);
    }

    #[test]
    fn direction_parses() {
        assert_eq!("vertical".parse::<LayoutDirection>(), Ok(LayoutDirection::Vertical));
        assert!("diagonal".parse::<LayoutDirection>().is_err());
    }
}
