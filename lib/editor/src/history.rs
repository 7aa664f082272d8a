//! Undo/redo over whole-graph snapshots.
//!
//! Every accepted mutation pushes the state it replaced onto `past` and drops
//! `future`. Between [`HistoryManager::begin_gesture`] and
//! [`HistoryManager::end_gesture`], mutations fold into a single entry holding
//! the pre-gesture state.

use chrono::{DateTime, Utc};
use flowcanvas_workflow::WorkflowGraph;
use std::collections::VecDeque;
use tracing::debug;

/// One restorable graph state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub graph: WorkflowGraph,
    /// When the state was replaced.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn now(graph: WorkflowGraph) -> Self {
        Self {
            graph,
            recorded_at: Utc::now(),
        }
    }
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    past: VecDeque<HistoryEntry>,
    future: Vec<HistoryEntry>,
    limit: usize,
    /// State captured when the open gesture began.
    gesture: Option<WorkflowGraph>,
}

impl HistoryManager {
    /// Creates empty history keeping at most `limit` undo entries.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.min(64)),
            future: Vec::new(),
            limit,
            gesture: None,
        }
    }

    /// Records `before` as the state an accepted mutation replaced.
    ///
    /// Always drops the redo stack. While a gesture is open no entry is
    /// written; the gesture baseline already covers it.
    pub fn record(&mut self, before: WorkflowGraph) {
        self.future.clear();
        if self.gesture.is_some() {
            return;
        }
        self.push_past(HistoryEntry::now(before));
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        if self.limit == 0 {
            return;
        }
        while self.past.len() >= self.limit {
            self.past.pop_front();
            debug!(limit = self.limit, "evicted oldest history entry");
        }
        self.past.push_back(entry);
    }

    /// Restores the previous state into `current`.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, current: &mut WorkflowGraph) -> bool {
        self.end_gesture(current);
        let Some(entry) = self.past.pop_back() else {
            return false;
        };
        let replaced = std::mem::replace(current, entry.graph);
        self.future.push(HistoryEntry::now(replaced));
        true
    }

    /// Re-applies the most recently undone state into `current`.
    ///
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, current: &mut WorkflowGraph) -> bool {
        self.end_gesture(current);
        let Some(entry) = self.future.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, entry.graph);
        self.push_past(HistoryEntry::now(replaced));
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo entries.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redo entries.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// The most recent undo entry.
    #[must_use]
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.past.back()
    }

    /// Opens a gesture with `current` as its baseline.
    ///
    /// Returns false if a gesture is already open; the earlier baseline is kept.
    pub fn begin_gesture(&mut self, current: &WorkflowGraph) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        self.gesture = Some(current.clone());
        true
    }

    /// Closes the open gesture.
    ///
    /// Writes one entry if `current` differs from the baseline and returns
    /// whether an entry was written.
    pub fn end_gesture(&mut self, current: &WorkflowGraph) -> bool {
        let Some(baseline) = self.gesture.take() else {
            return false;
        };
        if baseline == *current {
            return false;
        }
        self.record(baseline);
        true
    }

    /// Abandons the open gesture, returning its baseline for the caller to restore.
    pub fn cancel_gesture(&mut self) -> Option<WorkflowGraph> {
        self.gesture.take()
    }

    #[must_use]
    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Drops every entry and any open gesture.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.gesture = None;
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcanvas_workflow::{Node, NodeKind, Position};

    fn with_nodes(count: usize) -> WorkflowGraph {
        let nodes = (0..count)
            .map(|i| Node::new(NodeKind::Code, Position::new(i as f64, 0.0)))
            .collect();
        WorkflowGraph::from_parts(nodes, vec![])
    }

    fn grow(history: &mut HistoryManager, graph: &mut WorkflowGraph) {
        history.record(graph.clone());
        graph.push_node(Node::new(NodeKind::Code, Position::default()));
    }

    #[test]
    fn undo_then_redo_restores() {
        let mut history = HistoryManager::new(10);
        let mut graph = WorkflowGraph::new();
        grow(&mut history, &mut graph);
        let after = graph.clone();

        assert!(history.undo(&mut graph));
        assert!(graph.is_empty());
        assert!(history.redo(&mut graph));
        assert_eq!(graph, after);
    }

    #[test]
    fn bounds_are_no_ops() {
        let mut history = HistoryManager::new(10);
        let mut graph = with_nodes(1);
        assert!(!history.undo(&mut graph));
        assert!(!history.redo(&mut graph));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn new_mutation_clears_future() {
        let mut history = HistoryManager::new(10);
        let mut graph = WorkflowGraph::new();
        grow(&mut history, &mut graph);
        history.undo(&mut graph);
        assert!(history.can_redo());

        grow(&mut history, &mut graph);
        assert!(!history.can_redo());
    }

    #[test]
    fn mutation_inside_gesture_clears_future() {
        let mut history = HistoryManager::new(10);
        let mut graph = WorkflowGraph::new();
        grow(&mut history, &mut graph);
        history.undo(&mut graph);

        assert!(history.begin_gesture(&graph));
        grow(&mut history, &mut graph);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut graph));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn evicts_oldest_at_limit() {
        let mut history = HistoryManager::new(3);
        let mut graph = WorkflowGraph::new();
        for _ in 0..5 {
            grow(&mut history, &mut graph);
        }
        assert_eq!(history.undo_depth(), 3);

        while history.undo(&mut graph) {}
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn gesture_folds_into_one_entry() {
        let mut history = HistoryManager::new(10);
        let mut graph = with_nodes(1);
        let baseline = graph.clone();

        assert!(history.begin_gesture(&graph));
        for step in 0..20u32 {
            history.record(graph.clone());
            graph.nodes_mut().for_each(|n| n.position.x = f64::from(step));
        }
        assert!(history.end_gesture(&graph));

        assert_eq!(history.undo_depth(), 1);
        history.undo(&mut graph);
        assert_eq!(graph, baseline);
    }

    #[test]
    fn unchanged_gesture_writes_nothing() {
        let mut history = HistoryManager::new(10);
        let graph = with_nodes(2);
        history.begin_gesture(&graph);
        assert!(!history.end_gesture(&graph));
        assert!(!history.can_undo());
    }

    #[test]
    fn nested_begin_keeps_outer_baseline() {
        let mut history = HistoryManager::new(10);
        let mut graph = with_nodes(1);
        let baseline = graph.clone();

        history.begin_gesture(&graph);
        graph.push_node(Node::new(NodeKind::End, Position::default()));
        assert!(!history.begin_gesture(&graph));
        history.end_gesture(&graph);

        history.undo(&mut graph);
        assert_eq!(graph, baseline);
    }

    #[test]
    fn cancel_returns_baseline() {
        let mut history = HistoryManager::new(10);
        let mut graph = with_nodes(1);
        let baseline = graph.clone();

        history.begin_gesture(&graph);
        graph.push_node(Node::new(NodeKind::End, Position::default()));
        assert_eq!(history.cancel_gesture(), Some(baseline));
        assert!(!history.can_undo());
        assert!(!history.in_gesture());
    }

    #[test]
    fn undo_mid_gesture_closes_it_first() {
        let mut history = HistoryManager::new(10);
        let mut graph = with_nodes(1);
        let baseline = graph.clone();

        history.begin_gesture(&graph);
        graph.push_node(Node::new(NodeKind::End, Position::default()));
        assert!(history.undo(&mut graph));
        assert_eq!(graph, baseline);
        assert!(!history.in_gesture());
        assert!(history.can_redo());
    }

    #[test]
    fn entries_are_timestamped() {
        let before = Utc::now();
        let mut history = HistoryManager::new(10);
        history.record(WorkflowGraph::new());
        let entry = history.last_entry().expect("entry");
        assert!(entry.recorded_at >= before);
    }
}
