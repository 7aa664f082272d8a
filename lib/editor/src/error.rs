//! Error types for the editor crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `EditorError`: a mutation request that was refused. The store fails
//!   closed, so an error always means the graph is unchanged.
//!
//! Connection rule violations on single-edge requests are not errors; they
//! are reported through [`ConnectOutcome`](crate::store::ConnectOutcome).

use flowcanvas_core::{EdgeId, NodeId};
use flowcanvas_workflow::{GraphError, NodeKind, Rejection};
use std::fmt;

/// Editor errors.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorError {
    /// A node with this ID already exists.
    DuplicateNode { node_id: NodeId },
    /// An edge with this ID already exists.
    DuplicateEdge { edge_id: EdgeId },
    /// Node was not found.
    NodeNotFound { node_id: NodeId },
    /// The node exists but is not a group.
    NotAGroup { node_id: NodeId },
    /// A patch tried to change a node's kind.
    ConfigKindMismatch {
        node_id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },
    /// An edge in a batch broke a connection rule; nothing was committed.
    BatchRejected {
        edge_id: EdgeId,
        rejection: Rejection,
    },
    /// A snapshot failed structural validation.
    InvalidGraph { source: GraphError },
    /// A snapshot could not be parsed.
    MalformedSnapshot { details: String },
    /// The request needs at least one node.
    EmptySelection,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode { node_id } => write!(f, "node {node_id} already exists"),
            Self::DuplicateEdge { edge_id } => write!(f, "edge {edge_id} already exists"),
            Self::NodeNotFound { node_id } => write!(f, "node not found: {node_id}"),
            Self::NotAGroup { node_id } => write!(f, "node {node_id} is not a group"),
            Self::ConfigKindMismatch {
                node_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "node {node_id} is a {expected} node, cannot apply {actual} config"
                )
            }
            Self::BatchRejected { edge_id, rejection } => {
                write!(f, "edge {edge_id} rejected: {rejection}")
            }
            Self::InvalidGraph { source } => write!(f, "invalid graph: {source}"),
            Self::MalformedSnapshot { details } => {
                write!(f, "malformed snapshot: {details}")
            }
            Self::EmptySelection => write!(f, "no nodes given"),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<GraphError> for EditorError {
    fn from(source: GraphError) -> Self {
        match source {
            GraphError::DuplicateNode { node_id } => Self::DuplicateNode { node_id },
            GraphError::DuplicateEdge { edge_id } => Self::DuplicateEdge { edge_id },
            source => Self::InvalidGraph { source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_map_to_editor_errors() {
        let node_id = NodeId::new();
        let err = EditorError::from(GraphError::DuplicateNode { node_id });
        assert_eq!(err, EditorError::DuplicateNode { node_id });

        let parent_id = NodeId::new();
        let err = EditorError::from(GraphError::InvalidParent { node_id, parent_id });
        assert!(matches!(err, EditorError::InvalidGraph { .. }));
    }

    #[test]
    fn kind_mismatch_display() {
        let err = EditorError::ConfigKindMismatch {
            node_id: NodeId::new(),
            expected: NodeKind::Http,
            actual: NodeKind::Llm,
        };
        assert!(err.to_string().ends_with("is a http node, cannot apply llm config"));
    }
}
