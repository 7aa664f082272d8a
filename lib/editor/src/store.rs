//! The graph store.
//!
//! [`GraphStore`] owns the canonical state of one editor session: the graph
//! snapshot, workflow metadata, selection, clipboard, history and the dirty
//! flag. Every mutation request goes through it.
//!
//! Mutations are staged on a copy of the graph and swapped in only once they
//! have fully succeeded, so a failed request never leaves a partial change
//! behind. A request that leaves the graph unchanged writes no history entry.

use crate::clipboard::{ClipboardManager, Fragment};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::group::{self, GroupStyle};
use crate::history::HistoryManager;
use crate::layout::{self, LayoutDirection};
use crate::selection::SelectionManager;
use flowcanvas_core::{EdgeId, IdGenerator, NodeId, Result};
use flowcanvas_workflow::{
    Connection, ConnectionValidator, Edge, EdgeKind, GraphError, GroupColor, MetaPatch, Node,
    NodeConfig, NodeData, NodeKind, Port, Position, Rejection, Verdict, WorkflowDocument,
    WorkflowGraph, WorkflowMeta,
};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Result of a single connection request.
///
/// A rejected connection is an expected outcome of a canvas gesture, not a
/// failure, so it is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(EdgeId),
    Rejected(Rejection),
}

impl ConnectOutcome {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    #[must_use]
    pub fn edge_id(&self) -> Option<EdgeId> {
        match self {
            Self::Connected(edge_id) => Some(*edge_id),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Connected(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Inspector edit of a node's data. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    /// Must be of the node's kind.
    pub config: Option<NodeConfig>,
    pub inputs: Option<Vec<Port>>,
    pub outputs: Option<Vec<Port>>,
}

impl NodePatch {
    /// A patch that only renames the node.
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// A patch that only replaces the configuration.
    #[must_use]
    pub fn config(config: NodeConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    fn apply_to(self, data: &mut NodeData) {
        let Self {
            label,
            description,
            icon,
            config,
            inputs,
            outputs,
        } = self;
        if let Some(label) = label {
            data.label = label;
        }
        if let Some(description) = description {
            data.description = description;
        }
        if let Some(icon) = icon {
            data.icon = icon;
        }
        if let Some(config) = config {
            data.config = config;
        }
        if let Some(inputs) = inputs {
            data.inputs = inputs;
        }
        if let Some(outputs) = outputs {
            data.outputs = outputs;
        }
    }
}

/// Adds nodes to `graph`, failing on the first duplicate or bad parent.
///
/// Group frames go to the bottom of the stacking order. Parents are checked
/// after the whole batch is in, so a batch may carry a group with its members.
fn insert_nodes(
    graph: &mut WorkflowGraph,
    nodes: Vec<Node>,
) -> std::result::Result<Vec<NodeId>, EditorError> {
    let mut added = Vec::with_capacity(nodes.len());
    let mut parented = Vec::new();
    for node in nodes {
        if graph.contains_node(node.id) {
            return Err(EditorError::DuplicateNode { node_id: node.id });
        }
        added.push(node.id);
        if let Some(parent_id) = node.parent_id {
            parented.push((node.id, parent_id));
        }
        if node.is_group() {
            graph.push_node_back(node);
        } else {
            graph.push_node(node);
        }
    }

    for (node_id, parent_id) in parented {
        if !graph.node(parent_id).is_some_and(Node::is_group) {
            return Err(GraphError::InvalidParent { node_id, parent_id }.into());
        }
    }
    Ok(added)
}

/// Adds edges to `graph` one by one, each checked against those before it.
fn insert_edges(
    graph: &mut WorkflowGraph,
    edges: Vec<Edge>,
) -> std::result::Result<Vec<EdgeId>, EditorError> {
    let mut added = Vec::with_capacity(edges.len());
    for edge in edges {
        if graph.contains_edge(edge.id) {
            return Err(EditorError::DuplicateEdge { edge_id: edge.id });
        }
        if let Verdict::Rejected(rejection) = ConnectionValidator::check(graph, &edge.connection())
        {
            return Err(EditorError::BatchRejected {
                edge_id: edge.id,
                rejection,
            });
        }
        added.push(edge.id);
        graph.push_edge(edge);
    }
    Ok(added)
}

/// Canonical state of one editor session.
#[derive(Debug)]
pub struct GraphStore {
    config: EditorConfig,
    graph: WorkflowGraph,
    meta: WorkflowMeta,
    history: HistoryManager,
    selection: SelectionManager,
    clipboard: ClipboardManager,
    ids: IdGenerator,
    dirty: bool,
    /// Dirty flag as it was when the open gesture began.
    gesture_dirty: Option<bool>,
    version: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl GraphStore {
    /// Creates an empty store for a new editor session.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            history: HistoryManager::new(config.history_limit),
            config,
            graph: WorkflowGraph::new(),
            meta: WorkflowMeta::default(),
            selection: SelectionManager::new(),
            clipboard: ClipboardManager::new(),
            ids: IdGenerator::new(),
            dirty: false,
            gesture_dirty: None,
            version: 0,
        }
    }

    /// The current graph snapshot.
    #[must_use]
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Bumped on every change to the graph or selection.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.graph.node(node_id)
    }

    #[must_use]
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.graph.edge(edge_id)
    }

    #[must_use]
    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    #[must_use]
    pub fn clipboard(&self) -> &ClipboardManager {
        &self.clipboard
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// True when there are changes since the last save or load.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of entries `undo` can step back through.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.version += 1;
        self.selection.prune(&self.graph);
    }

    /// Swaps in `next` and records the replaced state. Returns false if
    /// nothing changed.
    fn commit(&mut self, action: &'static str, next: WorkflowGraph) -> bool {
        if next == self.graph {
            return false;
        }
        let before = std::mem::replace(&mut self.graph, next);
        self.history.record(before);
        self.touch();
        debug!(
            action,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "graph updated"
        );
        true
    }

    fn apply<T>(
        &mut self,
        action: &'static str,
        op: impl FnOnce(&mut WorkflowGraph) -> std::result::Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        let mut next = self.graph.clone();
        let value = op(&mut next)?;
        self.commit(action, next);
        Ok(value)
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Fails if the ID is taken or the parent is not a group.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, EditorError> {
        let node_id = node.id;
        self.apply("add_node", |graph| insert_nodes(graph, vec![node]))?;
        Ok(node_id)
    }

    /// Adds several nodes as one history entry. Nothing is added if any fails.
    ///
    /// # Errors
    ///
    /// Fails if any ID is taken or any parent is not a group.
    pub fn add_nodes(&mut self, nodes: Vec<Node>) -> Result<Vec<NodeId>, EditorError> {
        self.apply("add_nodes", |graph| insert_nodes(graph, nodes))
    }

    /// Drops a fresh node of `kind` from the palette.
    ///
    /// # Errors
    ///
    /// Fails only if the generated ID is already on the canvas.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        label: Option<&str>,
    ) -> Result<NodeId, EditorError> {
        let node = Node::from_data(self.ids.node_id(), position, kind.default_data(label));
        self.add_node(node)
    }

    /// Applies an inspector edit.
    ///
    /// # Errors
    ///
    /// Fails if the node does not exist, the new config is of another kind, or
    /// the new ports would break an existing edge.
    pub fn update_node(&mut self, node_id: NodeId, patch: NodePatch) -> Result<(), EditorError> {
        self.apply("update_node", |graph| {
            let node = graph
                .node_mut(node_id)
                .ok_or(EditorError::NodeNotFound { node_id })?;
            if let Some(config) = &patch.config
                && config.kind() != node.kind()
            {
                return Err(EditorError::ConfigKindMismatch {
                    node_id,
                    expected: node.kind(),
                    actual: config.kind(),
                });
            }
            patch.apply_to(&mut node.data);
            graph.validate()?;
            Ok(())
        })
    }

    /// Moves one node.
    ///
    /// # Errors
    ///
    /// Fails if the node does not exist.
    pub fn move_node(&mut self, node_id: NodeId, position: Position) -> Result<(), EditorError> {
        self.apply("move_node", |graph| {
            let node = graph
                .node_mut(node_id)
                .ok_or(EditorError::NodeNotFound { node_id })?;
            node.position = position;
            Ok(())
        })
    }

    /// Moves several nodes at once. Unknown IDs are ignored.
    ///
    /// Returns how many nodes actually moved.
    pub fn set_positions(&mut self, updates: &[(NodeId, Position)]) -> usize {
        let mut next = self.graph.clone();
        let mut moved = 0;
        for (node_id, position) in updates {
            if let Some(node) = next.node_mut(*node_id)
                && node.position != *position
            {
                node.position = *position;
                moved += 1;
            }
        }
        self.commit("set_positions", next);
        moved
    }

    /// Removes nodes together with every edge touching them, as one entry.
    ///
    /// Members of a removed group stay on the canvas at their current
    /// position. Returns how many nodes were removed.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> usize {
        let doomed: HashSet<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| self.graph.contains_node(*id))
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        let mut next = self.graph.clone();
        group::release_members(&mut next, &doomed);
        let (removed, dropped) = next.remove_nodes(&doomed);
        self.selection.remove_nodes(&doomed);
        self.commit("remove_nodes", next);
        debug!(nodes = removed.len(), edges = dropped.len(), "removed nodes");
        removed.len()
    }

    /// Replaces the whole node list. Edges left without an endpoint are dropped.
    ///
    /// # Errors
    ///
    /// Fails if the resulting graph breaks any structural rule.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> Result<(), EditorError> {
        self.apply("set_nodes", |graph| {
            graph.replace_nodes(nodes);
            graph.validate()?;
            Ok(())
        })
    }

    /// Adds an edge if it passes the connection rules.
    ///
    /// # Errors
    ///
    /// Fails only if the edge ID is taken. Rule violations come back as
    /// [`ConnectOutcome::Rejected`].
    pub fn add_edge(&mut self, edge: Edge) -> Result<ConnectOutcome, EditorError> {
        if self.graph.contains_edge(edge.id) {
            return Err(EditorError::DuplicateEdge { edge_id: edge.id }.into());
        }
        Ok(self.insert_checked(edge))
    }

    fn insert_checked(&mut self, edge: Edge) -> ConnectOutcome {
        let connection = edge.connection();
        if let Verdict::Rejected(rejection) = ConnectionValidator::check(&self.graph, &connection) {
            warn!(
                source = %connection.source,
                target = %connection.target,
                rule = rejection.rule(),
                "connection rejected: {rejection}"
            );
            return ConnectOutcome::Rejected(rejection);
        }

        let edge_id = edge.id;
        let mut next = self.graph.clone();
        next.push_edge(edge);
        self.commit("add_edge", next);
        ConnectOutcome::Connected(edge_id)
    }

    /// Handles a connect gesture from the canvas.
    ///
    /// The edge gets a fresh ID and a visual kind derived from its source:
    /// conditional when leaving a condition node, otherwise labeled with the
    /// source port's name when the port is declared.
    pub fn connect(&mut self, connection: Connection) -> ConnectOutcome {
        let mut edge_id = self.ids.edge_id();
        while self.graph.contains_edge(edge_id) {
            edge_id = self.ids.edge_id();
        }
        let edge = self.styled_edge(edge_id, connection);
        self.insert_checked(edge)
    }

    fn styled_edge(&self, edge_id: EdgeId, connection: Connection) -> Edge {
        let source = self.graph.node(connection.source);
        let from_condition = source.is_some_and(|n| n.kind() == NodeKind::Condition);
        let port_name = source
            .zip(connection.source_handle.as_deref())
            .and_then(|(node, handle)| node.output_port(handle))
            .map(|port| port.name.clone());

        let edge = Edge::new(edge_id, connection);
        match (from_condition, port_name) {
            (true, _) => edge.with_kind(EdgeKind::Conditional),
            (false, Some(name)) => edge.with_kind(EdgeKind::Labeled).with_label(name),
            (false, None) => edge.with_kind(EdgeKind::Default),
        }
    }

    /// Adds several edges as one history entry. Nothing is added if any fails.
    ///
    /// # Errors
    ///
    /// Fails with `BatchRejected` naming the first edge that breaks a rule,
    /// or `DuplicateEdge` if an ID is taken.
    pub fn add_edges(&mut self, edges: Vec<Edge>) -> Result<Vec<EdgeId>, EditorError> {
        self.apply("add_edges", |graph| insert_edges(graph, edges))
    }

    /// Removes edges as one entry. Returns how many were removed.
    pub fn remove_edges(&mut self, ids: &[EdgeId]) -> usize {
        let doomed: HashSet<EdgeId> = ids.iter().copied().collect();
        let mut next = self.graph.clone();
        let removed = next.remove_edges(&doomed);
        if removed.is_empty() {
            return 0;
        }
        self.selection.remove_edges(&doomed);
        self.commit("remove_edges", next);
        removed.len()
    }

    /// Replaces the whole edge list.
    ///
    /// # Errors
    ///
    /// Fails if any edge breaks a connection rule or shares an ID.
    pub fn set_edges(&mut self, edges: Vec<Edge>) -> Result<(), EditorError> {
        self.apply("set_edges", |graph| {
            graph.replace_edges(edges);
            graph.validate()?;
            Ok(())
        })
    }

    /// Steps back one entry. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.gesture_dirty = None;
        if !self.history.undo(&mut self.graph) {
            return false;
        }
        self.touch();
        debug!(remaining = self.history.undo_depth(), "undo");
        true
    }

    /// Steps forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.gesture_dirty = None;
        if !self.history.redo(&mut self.graph) {
            return false;
        }
        self.touch();
        debug!(remaining = self.history.redo_depth(), "redo");
        true
    }

    /// Starts a gesture; every change until [`GraphStore::end_gesture`] folds
    /// into one history entry.
    pub fn begin_gesture(&mut self) -> bool {
        if !self.history.begin_gesture(&self.graph) {
            return false;
        }
        self.gesture_dirty = Some(self.dirty);
        true
    }

    /// Ends the gesture. Returns true if it wrote a history entry.
    ///
    /// A gesture that left the graph as it found it also leaves the dirty
    /// flag as it found it.
    pub fn end_gesture(&mut self) -> bool {
        let recorded = self.history.end_gesture(&self.graph);
        if let Some(dirty) = self.gesture_dirty.take()
            && !recorded
        {
            self.dirty = dirty;
        }
        recorded
    }

    /// Aborts the gesture and restores the graph and dirty flag as they were
    /// when it began.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(baseline) = self.history.cancel_gesture() else {
            return false;
        };
        if let Some(dirty) = self.gesture_dirty.take() {
            self.dirty = dirty;
        }
        if baseline != self.graph {
            self.graph = baseline;
            self.version += 1;
            self.selection.prune(&self.graph);
        }
        true
    }

    /// Clears the dirty flag after the document has been saved.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn reset(&mut self) {
        self.graph = WorkflowGraph::new();
        self.history.clear();
        self.selection.clear();
        self.dirty = false;
        self.gesture_dirty = None;
        self.version += 1;
    }

    /// Replaces the session with a fresh graph.
    ///
    /// History and selection are cleared and the store is marked saved.
    ///
    /// # Errors
    ///
    /// If the snapshot breaks a structural rule the store is left empty.
    #[instrument(skip(self, graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn load(&mut self, graph: WorkflowGraph) -> Result<(), EditorError> {
        self.reset();
        if let Err(error) = graph.validate() {
            warn!(%error, "rejected workflow snapshot");
            return Err(EditorError::from(error).into());
        }
        self.graph = graph;
        info!("loaded workflow graph");
        Ok(())
    }

    /// Loads a whole document, metadata included.
    ///
    /// # Errors
    ///
    /// Same as [`GraphStore::load`]. A rejected document leaves default
    /// metadata behind.
    pub fn load_document(&mut self, document: WorkflowDocument) -> Result<(), EditorError> {
        let WorkflowDocument { meta, graph } = document;
        match self.load(graph) {
            Ok(()) => {
                self.meta = meta;
                Ok(())
            }
            Err(report) => {
                self.meta = WorkflowMeta::default();
                Err(report)
            }
        }
    }

    /// Parses and loads a JSON document.
    ///
    /// # Errors
    ///
    /// Fails with `MalformedSnapshot` if the text does not parse, leaving the
    /// store empty; otherwise as [`GraphStore::load`].
    pub fn load_json(&mut self, text: &str) -> Result<(), EditorError> {
        match serde_json::from_str::<WorkflowDocument>(text) {
            Ok(document) => self.load_document(document),
            Err(e) => {
                self.reset();
                self.meta = WorkflowMeta::default();
                warn!(error = %e, "unparseable workflow snapshot");
                Err(EditorError::MalformedSnapshot {
                    details: e.to_string(),
                }
                .into())
            }
        }
    }

    /// The current document, for persistence.
    #[must_use]
    pub fn document(&self) -> WorkflowDocument {
        WorkflowDocument {
            meta: self.meta.clone(),
            graph: self.graph.clone(),
        }
    }

    /// Serializes the current document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_json(&self) -> Result<String, EditorError> {
        let json = serde_json::to_string_pretty(&self.document()).map_err(|e| {
            EditorError::MalformedSnapshot {
                details: e.to_string(),
            }
        })?;
        Ok(json)
    }

    /// Discards the whole session: graph, metadata, history and selection.
    pub fn clear(&mut self) {
        self.reset();
        self.meta = WorkflowMeta::default();
        debug!("cleared workflow");
    }

    /// Edits workflow metadata. Marks the store dirty but is not undoable.
    pub fn update_meta(&mut self, patch: MetaPatch) {
        self.meta.apply(patch);
        self.dirty = true;
    }

    /// Selects existing nodes among `ids`.
    pub fn select(&mut self, ids: &[NodeId], additive: bool) {
        let graph = &self.graph;
        self.selection
            .select(ids.iter().copied().filter(|id| graph.contains_node(*id)), additive);
        self.version += 1;
    }

    /// Toggles one node in or out of the selection.
    pub fn toggle_selection(&mut self, node_id: NodeId) {
        if self.graph.contains_node(node_id) {
            self.selection.toggle(node_id);
            self.version += 1;
        }
    }

    /// Selects one edge; additive clicks toggle it.
    pub fn select_edge(&mut self, edge_id: EdgeId, additive: bool) {
        if self.graph.contains_edge(edge_id) {
            self.selection.select_edge(edge_id, additive);
            self.version += 1;
        }
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.graph);
        self.version += 1;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.version += 1;
    }

    /// Removes the selected nodes and edges as one entry.
    ///
    /// Returns the number of nodes and edges removed.
    pub fn delete_selection(&mut self) -> usize {
        let nodes: HashSet<NodeId> = self.selection.nodes().iter().copied().collect();
        let edges: HashSet<EdgeId> = self.selection.edges().iter().copied().collect();
        if nodes.is_empty() && edges.is_empty() {
            return 0;
        }

        let mut next = self.graph.clone();
        let removed_edges = next.remove_edges(&edges).len();
        group::release_members(&mut next, &nodes);
        let (removed_nodes, cascaded) = next.remove_nodes(&nodes);
        self.selection.clear();
        self.commit("delete_selection", next);
        removed_nodes.len() + removed_edges + cascaded.len()
    }

    /// Copies the selected nodes and the edges between them.
    ///
    /// Returns the number of nodes copied.
    pub fn copy_selection(&mut self) -> usize {
        self.clipboard.copy(&self.graph, self.selection.nodes())
    }

    /// Pastes the clipboard as one entry and selects the new nodes.
    ///
    /// `offset` defaults to the configured paste offset.
    ///
    /// # Errors
    ///
    /// Fails if the pasted fragment cannot be added; nothing is pasted then.
    pub fn paste(&mut self, offset: Option<Position>) -> Result<Vec<NodeId>, EditorError> {
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        let offset = offset.unwrap_or(self.config.paste_offset);
        let Fragment { nodes, edges } = self.clipboard.instantiate(&mut self.ids, offset);

        let added = self.apply("paste", |graph| {
            let added = insert_nodes(graph, nodes)?;
            insert_edges(graph, edges)?;
            Ok(added)
        })?;
        self.selection.select(added.iter().copied(), false);
        debug!(nodes = added.len(), "pasted nodes");
        Ok(added)
    }

    /// Copies the selection and pastes it right away.
    ///
    /// # Errors
    ///
    /// Same as [`GraphStore::paste`].
    pub fn duplicate_selection(&mut self) -> Result<Vec<NodeId>, EditorError> {
        if self.copy_selection() == 0 {
            return Ok(Vec::new());
        }
        self.paste(None)
    }

    /// Wraps nodes in a new group frame and returns its ID.
    ///
    /// # Errors
    ///
    /// Fails if none of `ids` can be grouped.
    pub fn create_group(
        &mut self,
        ids: &[NodeId],
        label: Option<&str>,
        color: GroupColor,
    ) -> Result<NodeId, EditorError> {
        let group_id = self.ids.node_id();
        let frame = self.config.group.clone();
        self.apply("create_group", |graph| {
            group::create_group(graph, group_id, ids, label, color, &frame)
        })?;
        Ok(group_id)
    }

    /// Dissolves a group, keeping its members where they are.
    ///
    /// # Errors
    ///
    /// Fails if `group_id` is not a group.
    pub fn ungroup(&mut self, group_id: NodeId) -> Result<Vec<NodeId>, EditorError> {
        self.apply("ungroup", |graph| group::ungroup(graph, group_id))
    }

    /// Moves top-level nodes into a group.
    ///
    /// # Errors
    ///
    /// Fails if `group_id` is not a group.
    pub fn add_nodes_to_group(
        &mut self,
        ids: &[NodeId],
        group_id: NodeId,
    ) -> Result<Vec<NodeId>, EditorError> {
        self.apply("add_nodes_to_group", |graph| {
            group::add_to_group(graph, ids, group_id)
        })
    }

    /// Takes nodes out of their groups.
    pub fn remove_nodes_from_group(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut next = self.graph.clone();
        let moved = group::remove_from_group(&mut next, ids);
        self.commit("remove_nodes_from_group", next);
        moved
    }

    /// Changes a group's label, color or collapsed state.
    ///
    /// # Errors
    ///
    /// Fails if `group_id` is not a group.
    pub fn update_group_style(
        &mut self,
        group_id: NodeId,
        style: GroupStyle,
    ) -> Result<(), EditorError> {
        self.apply("update_group_style", |graph| {
            group::update_style(graph, group_id, style)
        })
    }

    /// Collapses or expands a group, returning whether it is now collapsed.
    ///
    /// # Errors
    ///
    /// Fails if `group_id` is not a group.
    pub fn toggle_group_collapse(&mut self, group_id: NodeId) -> Result<bool, EditorError> {
        self.apply("toggle_group_collapse", |graph| {
            group::toggle_collapse(graph, group_id)
        })
    }

    /// Direct members of a group.
    #[must_use]
    pub fn group_children(&self, group_id: NodeId) -> Vec<&Node> {
        self.graph.children_of(group_id)
    }

    /// Lays out the top-level nodes in layers as one entry.
    ///
    /// Returns how many nodes moved.
    pub fn auto_layout(&mut self, direction: LayoutDirection) -> usize {
        let positions = layout::compute_layout(&self.graph, direction, &self.config.layout);
        let moved = self.set_positions(&positions);
        debug!(%direction, moved, "auto layout");
        moved
    }
}
