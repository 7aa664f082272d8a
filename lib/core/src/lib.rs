//! Core domain types and utilities for flowcanvas.
//!
//! This crate provides the identifier types and the error handling
//! foundation shared by the workflow model, the edit engine, and the CLI.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{EdgeId, IdGenerator, NodeId, ParseIdError, WorkflowId};
