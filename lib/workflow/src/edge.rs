//! Edge types for workflow graphs.
//!
//! Edges connect ports between nodes. Each edge specifies:
//! - The source node and output port handle
//! - The target node and input port handle

use flowcanvas_core::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Visual style of an edge. Carries no meaning for connection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    #[default]
    Default,
    /// Shows the source port name along the wire.
    Labeled,
    /// Leaves a condition node through its true/false branch.
    Conditional,
}

/// Display payload of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A proposed connection between two ports, before it becomes an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// The source node ID.
    pub source: NodeId,
    /// The output port ID on the source node.
    #[serde(default)]
    pub source_handle: Option<String>,
    /// The target node ID.
    pub target: NodeId,
    /// The input port ID on the target node.
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl Connection {
    /// Creates a new connection between two named ports.
    #[must_use]
    pub fn new(
        source: NodeId,
        source_handle: impl Into<String>,
        target: NodeId,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source,
            source_handle: Some(source_handle.into()),
            target,
            target_handle: Some(target_handle.into()),
        }
    }

    /// Creates a connection between two nodes without port handles.
    #[must_use]
    pub fn untyped(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            source_handle: None,
            target,
            target_handle: None,
        }
    }
}

/// An edge connecting two ports in a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    #[serde(default)]
    pub source_handle: Option<String>,
    pub target: NodeId,
    #[serde(default)]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
    #[serde(default)]
    pub data: EdgeData,
}

impl Edge {
    /// Creates an edge with the given ID from a connection.
    #[must_use]
    pub fn new(id: EdgeId, connection: Connection) -> Self {
        Self {
            id,
            source: connection.source,
            source_handle: connection.source_handle,
            target: connection.target,
            target_handle: connection.target_handle,
            kind: None,
            data: EdgeData::default(),
        }
    }

    /// Sets the visual kind.
    #[must_use]
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = Some(label.into());
        self
    }

    /// Returns the connection this edge realizes.
    #[must_use]
    pub fn connection(&self) -> Connection {
        Connection {
            source: self.source,
            source_handle: self.source_handle.clone(),
            target: self.target,
            target_handle: self.target_handle.clone(),
        }
    }

    /// Returns true if either endpoint is the given node.
    #[must_use]
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Returns true if this edge terminates at the given input port.
    #[must_use]
    pub fn ends_at(&self, node_id: NodeId, handle: Option<&str>) -> bool {
        self.target == node_id && self.target_handle.as_deref() == handle
    }
}
