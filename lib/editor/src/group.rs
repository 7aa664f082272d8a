//! Group frames.
//!
//! A group is a node of kind `group` that owns other nodes through their
//! `parent_id`. Member positions are relative to the group's position, and
//! collapsing a group hides its members.
//!
//! These functions edit a graph in place and leave history to the caller.

use crate::config::GroupConfig;
use crate::error::EditorError;
use flowcanvas_core::NodeId;
use flowcanvas_workflow::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, GroupColor, Node, NodeConfig, NodeKind, Position,
    Size, WorkflowGraph,
};
use std::collections::HashSet;

/// Label given to a group when none is supplied.
pub const DEFAULT_GROUP_LABEL: &str = "New Group";

/// Changes to a group's appearance. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStyle {
    pub label: Option<String>,
    pub color: Option<GroupColor>,
    pub collapsed: Option<bool>,
}

fn require_group(graph: &WorkflowGraph, group_id: NodeId) -> Result<&Node, EditorError> {
    let node = graph
        .node(group_id)
        .ok_or(EditorError::NodeNotFound { node_id: group_id })?;
    if !node.is_group() {
        return Err(EditorError::NotAGroup { node_id: group_id });
    }
    Ok(node)
}

fn is_collapsed(node: &Node) -> bool {
    matches!(node.data.config, NodeConfig::Group { collapsed: true, .. })
}

/// Computes the frame enclosing the given canvas positions.
///
/// Every node is assumed to have the default node size. The frame leaves
/// `padding` on each side plus `title_band` above the members.
#[must_use]
pub fn frame_around(positions: &[Position], config: &GroupConfig) -> (Position, Size) {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in positions {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x + DEFAULT_NODE_WIDTH);
        max_y = max_y.max(p.y + DEFAULT_NODE_HEIGHT);
    }

    let origin = Position::new(
        min_x - config.padding,
        min_y - config.padding - config.title_band,
    );
    let size = Size {
        width: max_x - min_x + config.padding * 2.0,
        height: max_y - min_y + config.padding * 2.0 + config.title_band,
    };
    (origin, size)
}

/// Wraps the given nodes in a new group frame.
///
/// Group nodes among `ids` are skipped. The frame goes to the bottom of the
/// stacking order and the members move into its coordinate space.
///
/// # Errors
///
/// Returns `EmptySelection` if no groupable node is listed.
pub fn create_group(
    graph: &mut WorkflowGraph,
    group_id: NodeId,
    ids: &[NodeId],
    label: Option<&str>,
    color: GroupColor,
    config: &GroupConfig,
) -> Result<Vec<NodeId>, EditorError> {
    let wanted: HashSet<NodeId> = ids.iter().copied().collect();
    let members: Vec<(NodeId, Position)> = graph
        .nodes()
        .iter()
        .filter(|node| wanted.contains(&node.id) && !node.is_group())
        .filter_map(|node| Some((node.id, graph.absolute_position(node.id)?)))
        .collect();
    if members.is_empty() {
        return Err(EditorError::EmptySelection);
    }

    let positions: Vec<Position> = members.iter().map(|(_, p)| *p).collect();
    let (origin, size) = frame_around(&positions, config);

    let mut frame = Node::with_id(group_id, NodeKind::Group, origin);
    frame.data.label = label
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_GROUP_LABEL)
        .to_string();
    frame.data.config = NodeConfig::Group {
        collapsed: false,
        color,
    };
    frame.size = Some(size);
    graph.push_node_back(frame);

    for (member_id, absolute) in &members {
        if let Some(node) = graph.node_mut(*member_id) {
            node.parent_id = Some(group_id);
            node.position = absolute.relative_to(origin);
            node.hidden = false;
        }
    }

    Ok(members.into_iter().map(|(id, _)| id).collect())
}

/// Dissolves a group, returning its former members.
///
/// Members keep their canvas position and become visible again.
///
/// # Errors
///
/// Returns an error if `group_id` is missing or not a group.
pub fn ungroup(graph: &mut WorkflowGraph, group_id: NodeId) -> Result<Vec<NodeId>, EditorError> {
    let origin = require_group(graph, group_id)?.position;
    let mut released = Vec::new();
    for node in graph.nodes_mut() {
        if node.parent_id == Some(group_id) {
            node.parent_id = None;
            node.position = node.position.offset(origin);
            node.hidden = false;
            released.push(node.id);
        }
    }
    graph.remove_nodes(&HashSet::from([group_id]));
    Ok(released)
}

/// Moves top-level nodes into an existing group.
///
/// Nodes that already belong to a group, and group nodes, are skipped.
/// Returns the IDs that moved.
///
/// # Errors
///
/// Returns an error if `group_id` is missing or not a group.
pub fn add_to_group(
    graph: &mut WorkflowGraph,
    ids: &[NodeId],
    group_id: NodeId,
) -> Result<Vec<NodeId>, EditorError> {
    let group = require_group(graph, group_id)?;
    let origin = group.position;
    let hidden = is_collapsed(group);

    let wanted: HashSet<NodeId> = ids.iter().copied().collect();
    let mut moved = Vec::new();
    for node in graph.nodes_mut() {
        if wanted.contains(&node.id) && node.parent_id.is_none() && !node.is_group() {
            node.parent_id = Some(group_id);
            node.position = node.position.relative_to(origin);
            node.hidden = hidden;
            moved.push(node.id);
        }
    }
    Ok(moved)
}

/// Takes nodes out of whatever group holds them. Returns the IDs that moved.
pub fn remove_from_group(graph: &mut WorkflowGraph, ids: &[NodeId]) -> Vec<NodeId> {
    let wanted: HashSet<NodeId> = ids.iter().copied().collect();
    let updates: Vec<(NodeId, Position)> = graph
        .nodes()
        .iter()
        .filter(|node| wanted.contains(&node.id) && node.parent_id.is_some())
        .map(|node| {
            let absolute = graph.absolute_position(node.id).unwrap_or(node.position);
            (node.id, absolute)
        })
        .collect();

    for (node_id, absolute) in &updates {
        if let Some(node) = graph.node_mut(*node_id) {
            node.parent_id = None;
            node.position = *absolute;
            node.hidden = false;
        }
    }
    updates.into_iter().map(|(id, _)| id).collect()
}

/// Applies a style change to a group.
///
/// Changing `collapsed` also hides or shows the members.
///
/// # Errors
///
/// Returns an error if `group_id` is missing or not a group.
pub fn update_style(
    graph: &mut WorkflowGraph,
    group_id: NodeId,
    style: GroupStyle,
) -> Result<(), EditorError> {
    require_group(graph, group_id)?;
    let GroupStyle {
        label,
        color,
        collapsed,
    } = style;

    if let Some(group) = graph.node_mut(group_id) {
        if let Some(label) = label {
            group.data.label = label;
        }
        if let NodeConfig::Group {
            collapsed: current_collapsed,
            color: current_color,
        } = &mut group.data.config
        {
            if let Some(color) = color {
                *current_color = color;
            }
            if let Some(collapsed) = collapsed {
                *current_collapsed = collapsed;
            }
        }
    }

    if let Some(collapsed) = collapsed {
        set_members_hidden(graph, group_id, collapsed);
    }
    Ok(())
}

/// Flips a group between collapsed and expanded, returning the new state.
///
/// # Errors
///
/// Returns an error if `group_id` is missing or not a group.
pub fn toggle_collapse(graph: &mut WorkflowGraph, group_id: NodeId) -> Result<bool, EditorError> {
    let collapsed = !is_collapsed(require_group(graph, group_id)?);
    update_style(
        graph,
        group_id,
        GroupStyle {
            collapsed: Some(collapsed),
            ..GroupStyle::default()
        },
    )?;
    Ok(collapsed)
}

fn set_members_hidden(graph: &mut WorkflowGraph, group_id: NodeId, hidden: bool) {
    for node in graph.nodes_mut() {
        if node.parent_id == Some(group_id) {
            node.hidden = hidden;
        }
    }
}

/// Releases the members of groups that are about to be removed.
///
/// Members keep their canvas position. Members that are themselves being
/// removed are left alone.
pub fn release_members(graph: &mut WorkflowGraph, removing: &HashSet<NodeId>) {
    let groups: Vec<NodeId> = graph
        .nodes()
        .iter()
        .filter(|node| node.is_group() && removing.contains(&node.id))
        .map(|node| node.id)
        .collect();
    if groups.is_empty() {
        return;
    }

    let orphans: Vec<NodeId> = graph
        .nodes()
        .iter()
        .filter(|node| {
            !removing.contains(&node.id) && node.parent_id.is_some_and(|p| groups.contains(&p))
        })
        .map(|node| node.id)
        .collect();
    remove_from_group(graph, &orphans);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GroupConfig {
        GroupConfig::default()
    }

    fn two_nodes() -> (WorkflowGraph, NodeId, NodeId) {
        let a = Node::new(NodeKind::Code, Position::new(100.0, 100.0));
        let b = Node::new(NodeKind::Code, Position::new(500.0, 300.0));
        let (a_id, b_id) = (a.id, b.id);
        (WorkflowGraph::from_parts(vec![a, b], vec![]), a_id, b_id)
    }

    fn wrap(graph: &mut WorkflowGraph, group_id: NodeId, ids: &[NodeId]) {
        create_group(graph, group_id, ids, None, GroupColor::Default, &config()).expect("group");
    }

    #[test]
    fn frame_includes_padding_and_title() {
        let (origin, size) = frame_around(
            &[Position::new(100.0, 100.0), Position::new(500.0, 300.0)],
            &config(),
        );
        assert_eq!(origin, Position::new(60.0, 20.0));
        assert_eq!(size.width, 400.0 + 280.0 + 80.0);
        assert_eq!(size.height, 200.0 + 120.0 + 80.0 + 40.0);
    }

    #[test]
    fn create_group_reparents_members() {
        let (mut graph, a, b) = two_nodes();
        let group_id = NodeId::new();
        let members = create_group(
            &mut graph,
            group_id,
            &[a, b],
            Some("Fetch"),
            GroupColor::Blue,
            &config(),
        )
        .expect("group");

        assert_eq!(members.len(), 2);
        assert_eq!(graph.nodes()[0].id, group_id);
        assert_eq!(graph.nodes()[0].data.label, "Fetch");
        let a_node = graph.node(a).expect("a");
        assert_eq!(a_node.parent_id, Some(group_id));
        assert_eq!(a_node.position, Position::new(40.0, 80.0));
        assert_eq!(graph.absolute_position(a), Some(Position::new(100.0, 100.0)));
        assert_eq!(graph.validate(), Ok(()));
    }

    #[test]
    fn create_group_of_nothing_fails() {
        let (mut graph, ..) = two_nodes();
        let before = graph.clone();
        let ghost = NodeId::new();
        let result = create_group(
            &mut graph,
            NodeId::new(),
            &[ghost],
            None,
            GroupColor::Default,
            &config(),
        );
        assert_eq!(result, Err(EditorError::EmptySelection));
        assert_eq!(graph, before);
    }

    #[test]
    fn ungroup_round_trips_positions() {
        let (mut graph, a, b) = two_nodes();
        let before = graph.clone();
        let group_id = NodeId::new();
        wrap(&mut graph, group_id, &[a, b]);

        let released = ungroup(&mut graph, group_id).expect("ungroup");
        assert_eq!(released.len(), 2);
        assert_eq!(graph, before);
    }

    #[test]
    fn ungroup_rejects_plain_node() {
        let (mut graph, a, _) = two_nodes();
        assert_eq!(ungroup(&mut graph, a), Err(EditorError::NotAGroup { node_id: a }));
    }

    #[test]
    fn collapse_hides_members() {
        let (mut graph, a, b) = two_nodes();
        let group_id = NodeId::new();
        wrap(&mut graph, group_id, &[a]);

        assert!(toggle_collapse(&mut graph, group_id).expect("toggle"));
        assert!(graph.node(a).expect("a").hidden);
        assert!(!graph.node(b).expect("b").hidden);

        add_to_group(&mut graph, &[b], group_id).expect("add");
        assert!(graph.node(b).expect("b").hidden);

        assert!(!toggle_collapse(&mut graph, group_id).expect("toggle"));
        assert!(graph.children_of(group_id).iter().all(|n| !n.hidden));
    }

    #[test]
    fn remove_from_group_restores_canvas_position() {
        let (mut graph, a, b) = two_nodes();
        let group_id = NodeId::new();
        wrap(&mut graph, group_id, &[a, b]);

        let moved = remove_from_group(&mut graph, &[a]);
        assert_eq!(moved, vec![a]);
        let node = graph.node(a).expect("a");
        assert_eq!(node.parent_id, None);
        assert_eq!(node.position, Position::new(100.0, 100.0));
        assert_eq!(graph.children_of(group_id).len(), 1);
    }

    #[test]
    fn update_style_changes_color_and_label() {
        let (mut graph, a, _) = two_nodes();
        let group_id = NodeId::new();
        wrap(&mut graph, group_id, &[a]);

        update_style(
            &mut graph,
            group_id,
            GroupStyle {
                label: Some("Renamed".to_string()),
                color: Some(GroupColor::Rose),
                collapsed: None,
            },
        )
        .expect("style");

        let group = graph.node(group_id).expect("group");
        assert_eq!(group.data.label, "Renamed");
        assert!(matches!(
            group.data.config,
            NodeConfig::Group {
                color: GroupColor::Rose,
                collapsed: false
            }
        ));
    }
}
