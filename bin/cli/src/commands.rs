//! Command implementations, kept apart from argument parsing so they can be
//! tested against files on disk.

use crate::config::CliConfig;
use crate::error::CliError;
use flowcanvas_editor::{GraphStore, LayoutDirection};
use flowcanvas_workflow::{GraphError, WorkflowSummary};
use rootcause::prelude::Report;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What `check` found in a workflow file.
#[derive(Debug)]
pub struct CheckReport {
    pub summary: WorkflowSummary,
    /// Labels of nodes with no incoming edge.
    pub entry_nodes: Vec<String>,
    /// Required inputs left unconnected. Advisory only.
    pub warnings: Vec<GraphError>,
}

fn open(path: &Path, config: &CliConfig) -> Result<GraphStore, Report<CliError>> {
    let text = fs::read_to_string(path).map_err(|e| CliError::ReadFailed {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    let mut store = GraphStore::new(config.editor.clone());
    store
        .load_json(&text)
        .map_err(|report| CliError::InvalidWorkflow {
            path: path.to_path_buf(),
            details: report.current_context().to_string(),
        })?;
    debug!(path = %path.display(), nodes = store.graph().node_count(), "opened workflow");
    Ok(store)
}

/// Loads a workflow file and reports on its structure.
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid workflow.
pub fn check(path: &Path, config: &CliConfig) -> Result<CheckReport, Report<CliError>> {
    let store = open(path, config)?;
    let graph = store.graph();
    Ok(CheckReport {
        summary: WorkflowSummary::from(&store.document()),
        entry_nodes: graph
            .entry_nodes()
            .into_iter()
            .map(|node| node.data.label.clone())
            .collect(),
        warnings: graph.missing_required_inputs(),
    })
}

/// Auto-lays out a workflow file and writes the result.
///
/// Writes back to `path` unless `output` is given. Returns how many nodes moved.
///
/// # Errors
///
/// Fails if the input cannot be loaded or the output cannot be written.
pub fn layout(
    path: &Path,
    direction: LayoutDirection,
    output: Option<PathBuf>,
    config: &CliConfig,
) -> Result<usize, Report<CliError>> {
    let mut store = open(path, config)?;
    let moved = store.auto_layout(direction);

    let serialized = if config.pretty {
        serde_json::to_string_pretty(&store.document())
    } else {
        serde_json::to_string(&store.document())
    };
    let json = serialized.map_err(|e| CliError::SerializeFailed {
        details: e.to_string(),
    })?;

    let target = output.unwrap_or_else(|| path.to_path_buf());
    fs::write(&target, json).map_err(|e| CliError::WriteFailed {
        path: target.clone(),
        details: e.to_string(),
    })?;
    info!(path = %target.display(), %direction, moved, "wrote laid out workflow");
    Ok(moved)
}
