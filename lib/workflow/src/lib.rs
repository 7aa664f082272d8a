//! Workflow graph model for flowcanvas.
//!
//! This crate provides the data model the editor operates on:
//!
//! - **Graph Model**: ordered node and edge lists, with petgraph for reachability
//! - **Node Types**: the closed palette of node kinds and their default data
//! - **Port System**: named input/output ports with simple data types
//! - **Validation**: the connection rules every edge must satisfy

pub mod definition;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod port;
pub mod validator;

pub use definition::{
    MetaPatch, TriggerType, WorkflowDocument, WorkflowMeta, WorkflowStatus, WorkflowSummary,
};
pub use edge::{Connection, Edge, EdgeData, EdgeKind};
pub use error::{GraphError, Rejection};
pub use graph::WorkflowGraph;
pub use node::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, GroupColor, Node, NodeConfig, NodeData, NodeKind,
    Position, Size,
};
pub use port::{Port, PortType};
pub use validator::{ConnectionValidator, Verdict};
