//! Graph edit engine for the flowcanvas workflow editor.
//!
//! This crate owns the state behind the canvas:
//!
//! - **Store**: [`GraphStore`], the single owner of the graph, selection and dirty flag
//! - **History**: bounded undo/redo with gesture coalescing
//! - **Selection** and **Clipboard**: multi-select, copy, paste and duplicate
//! - **Groups**: frames that own child nodes
//! - **Layout**: layered auto-layout
//!
//! # Example
//!
//! ```
//! use flowcanvas_editor::{EditorConfig, GraphStore};
//! use flowcanvas_workflow::{Connection, NodeKind, Position};
//!
//! let mut store = GraphStore::new(EditorConfig::default());
//! let start = store.create_node(NodeKind::Start, Position::new(0.0, 0.0), None).unwrap();
//! let end = store.create_node(NodeKind::End, Position::new(300.0, 0.0), None).unwrap();
//!
//! let outcome = store.connect(Connection::new(start, "output", end, "input"));
//! assert!(outcome.is_connected());
//!
//! store.undo();
//! assert_eq!(store.graph().edge_count(), 0);
//! ```

pub mod clipboard;
pub mod config;
pub mod error;
pub mod group;
pub mod history;
pub mod layout;
pub mod selection;
pub mod store;

pub use clipboard::{ClipboardManager, Fragment};
pub use config::{EditorConfig, GroupConfig, LayoutConfig};
pub use error::EditorError;
pub use group::GroupStyle;
pub use history::{HistoryEntry, HistoryManager};
pub use layout::LayoutDirection;
pub use selection::SelectionManager;
pub use store::{ConnectOutcome, GraphStore, NodePatch};
