//! Error types for the workflow crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `Rejection`: why a proposed connection may not become an edge. This is a
//!   value, not a failure; callers surface it to the user as-is.
//! - `GraphError`: structural problems in a graph snapshot (duplicate IDs,
//!   dangling references, edges that break a connection rule)

use crate::port::PortType;
use flowcanvas_core::{EdgeId, NodeId};
use std::fmt;

/// The specific connection rule a proposed edge violates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Source and target are the same node.
    SelfLoop { node_id: NodeId },
    /// An endpoint does not exist in the graph.
    MissingEndpoint { node_id: NodeId },
    /// A path already leads from target back to source.
    Cycle { source: NodeId, target: NodeId },
    /// The declared port types cannot carry the same data.
    TypeMismatch {
        source_port: String,
        source_type: PortType,
        target_port: String,
        target_type: PortType,
    },
    /// The single-arity target port already has an incoming edge.
    ArityExceeded {
        node_id: NodeId,
        port: Option<String>,
    },
    /// An identical connection already exists.
    Duplicate,
}

impl Rejection {
    /// Short machine-readable name of the violated rule.
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::SelfLoop { .. } => "self_loop",
            Self::MissingEndpoint { .. } => "missing_endpoint",
            Self::Cycle { .. } => "cycle",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ArityExceeded { .. } => "arity",
            Self::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop { node_id } => {
                write!(f, "node {node_id} cannot connect to itself")
            }
            Self::MissingEndpoint { node_id } => {
                write!(f, "node {node_id} does not exist")
            }
            Self::Cycle { source, target } => {
                write!(f, "connecting {source} -> {target} would create a cycle")
            }
            Self::TypeMismatch {
                source_port,
                source_type,
                target_port,
                target_type,
            } => {
                write!(
                    f,
                    "type mismatch: {source_port} ({source_type}) -> {target_port} ({target_type})"
                )
            }
            Self::ArityExceeded { node_id, port } => {
                let port = port.as_deref().unwrap_or("<default>");
                write!(f, "input port '{port}' on node {node_id} is already connected")
            }
            Self::Duplicate => write!(f, "connection already exists"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Errors from graph snapshot validation.
///
/// These errors contain only information available at the graph layer.
/// Editor-level context should be added by the caller using `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share an ID.
    DuplicateNode { node_id: NodeId },
    /// Two edges share an ID.
    DuplicateEdge { edge_id: EdgeId },
    /// A node's parent is missing or is not a group.
    InvalidParent { node_id: NodeId, parent_id: NodeId },
    /// An edge breaks a connection rule.
    EdgeRejected {
        edge_id: EdgeId,
        rejection: Rejection,
    },
    /// A required input port has no incoming edge.
    RequiredInputMissing { node_id: NodeId, port: String },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode { node_id } => {
                write!(f, "duplicate node id: {node_id}")
            }
            Self::DuplicateEdge { edge_id } => {
                write!(f, "duplicate edge id: {edge_id}")
            }
            Self::InvalidParent { node_id, parent_id } => {
                write!(f, "node {node_id} refers to missing group {parent_id}")
            }
            Self::EdgeRejected { edge_id, rejection } => {
                write!(f, "edge {edge_id} rejected: {rejection}")
            }
            Self::RequiredInputMissing { node_id, port } => {
                write!(
                    f,
                    "required input port '{port}' on node {node_id} has no incoming edge"
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_names_rule() {
        let cycle = Rejection::Cycle {
            source: NodeId::new(),
            target: NodeId::new(),
        };
        assert_eq!(cycle.rule(), "cycle");
        assert!(cycle.to_string().contains("cycle"));
    }

    #[test]
    fn type_mismatch_display() {
        let err = Rejection::TypeMismatch {
            source_port: "rows".to_string(),
            source_type: PortType::Array,
            target_port: "sql".to_string(),
            target_type: PortType::String,
        };
        assert_eq!(err.to_string(), "type mismatch: rows (array) -> sql (string)");
    }

    #[test]
    fn graph_error_display() {
        let node_id = NodeId::new();
        let parent_id = NodeId::new();
        let err = GraphError::InvalidParent { node_id, parent_id };
        assert_eq!(
            err.to_string(),
            format!("node {node_id} refers to missing group {parent_id}")
        );
    }

    #[test]
    fn edge_rejected_carries_reason() {
        let err = GraphError::EdgeRejected {
            edge_id: EdgeId::new(),
            rejection: Rejection::Duplicate,
        };
        assert!(err.to_string().ends_with("connection already exists"));
    }
}
