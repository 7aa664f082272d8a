//! Workflow definition types.
//!
//! A workflow document consists of:
//! - Metadata (name, description, status, version, timestamps)
//! - A directed graph of nodes

use crate::graph::WorkflowGraph;
use chrono::{DateTime, Utc};
use flowcanvas_core::WorkflowId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication status of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// How a workflow run is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    #[default]
    Manual,
    Webhook,
    Schedule,
    Event,
}

/// Metadata for a workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMeta {
    pub id: WorkflowId,
    /// Human-readable name for this workflow.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub trigger_type: TriggerType,
    /// Revision number, bumped by the persistence layer on each save.
    #[serde(default = "default_version")]
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl WorkflowMeta {
    /// Creates new metadata with default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowId::new(),
            name: name.into(),
            description: None,
            status: WorkflowStatus::Draft,
            trigger_type: TriggerType::Manual,
            version: default_version(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a patch and bumps `updated_at`.
    pub fn apply(&mut self, patch: MetaPatch) {
        let MetaPatch {
            name,
            description,
            status,
            trigger_type,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(trigger_type) = trigger_type {
            self.trigger_type = trigger_type;
        }
        self.touch();
    }

    /// Marks the metadata as updated (bumps updated_at timestamp).
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for WorkflowMeta {
    fn default() -> Self {
        Self::new("Untitled Workflow")
    }
}

/// Partial update of workflow metadata. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPatch {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
    #[serde(default)]
    pub trigger_type: Option<TriggerType>,
}

/// A complete workflow document as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub meta: WorkflowMeta,
    #[serde(flatten)]
    pub graph: WorkflowGraph,
}

/// Summary information about a workflow (for listings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    pub status: WorkflowStatus,
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Number of edges in the graph.
    pub edge_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&WorkflowDocument> for WorkflowSummary {
    fn from(document: &WorkflowDocument) -> Self {
        Self {
            id: document.meta.id,
            name: document.meta.name.clone(),
            status: document.meta.status,
            node_count: document.graph.node_count(),
            edge_count: document.graph.edge_count(),
            updated_at: document.meta.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind, Position};

    #[test]
    fn new_meta_is_draft() {
        let meta = WorkflowMeta::new("Onboarding");
        assert_eq!(meta.name, "Onboarding");
        assert_eq!(meta.status, WorkflowStatus::Draft);
        assert_eq!(meta.version, 1);
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let mut meta = WorkflowMeta::new("Before").with_description("keep me");
        let created = meta.created_at;
        meta.apply(MetaPatch {
            status: Some(WorkflowStatus::Published),
            ..MetaPatch::default()
        });

        assert_eq!(meta.name, "Before");
        assert_eq!(meta.description.as_deref(), Some("keep me"));
        assert_eq!(meta.status, WorkflowStatus::Published);
        assert!(meta.updated_at >= created);
    }

    #[test]
    fn patch_can_clear_description() {
        let mut meta = WorkflowMeta::new("x").with_description("gone");
        meta.apply(MetaPatch {
            description: Some(None),
            ..MetaPatch::default()
        });
        assert_eq!(meta.description, None);
    }

    #[test]
    fn document_without_meta_parses() {
        let node = Node::new(NodeKind::Start, Position::default());
        let json = serde_json::json!({ "nodes": [node], "edges": [] });
        let document: WorkflowDocument = serde_json::from_value(json).expect("deserialize");
        assert_eq!(document.graph.node_count(), 1);
        assert_eq!(document.meta.name, "Untitled Workflow");

        let summary = WorkflowSummary::from(&document);
        assert_eq!(summary.node_count, 1);
        assert_eq!(summary.edge_count, 0);
    }
}
