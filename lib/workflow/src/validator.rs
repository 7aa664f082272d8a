//! Connection rules for workflow graphs.
//!
//! [`ConnectionValidator::check`] decides whether a proposed connection may
//! become an edge. It never mutates the graph. Checks run in order and stop
//! at the first failure:
//!
//! 1. Self-loops
//! 2. Missing endpoint nodes
//! 3. Cycles: a path from the target back to the source
//! 4. Port resolution: an undeclared handle on either side is an untyped
//!    passthrough and skips the type check
//! 5. Type compatibility
//! 6. Arity: a single-arity input accepts one incoming edge
//! 7. Exact duplicates

use crate::edge::Connection;
use crate::error::Rejection;
use crate::graph::WorkflowGraph;

/// Outcome of checking a proposed connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    /// Returns true if the connection may be added.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the violated rule, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Stateless predicate over a graph snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Checks whether `connection` may be added to `graph`.
    #[must_use]
    pub fn check(graph: &WorkflowGraph, connection: &Connection) -> Verdict {
        match Self::evaluate(graph, connection) {
            Ok(()) => Verdict::Accepted,
            Err(rejection) => Verdict::Rejected(rejection),
        }
    }

    fn evaluate(graph: &WorkflowGraph, connection: &Connection) -> Result<(), Rejection> {
        let Connection {
            source,
            target,
            source_handle,
            target_handle,
        } = connection;

        if source == target {
            return Err(Rejection::SelfLoop { node_id: *source });
        }

        let source_node = graph
            .node(*source)
            .ok_or(Rejection::MissingEndpoint { node_id: *source })?;
        let target_node = graph
            .node(*target)
            .ok_or(Rejection::MissingEndpoint { node_id: *target })?;

        // Adding source -> target closes a cycle iff target already reaches source.
        if graph.has_path(*target, *source) {
            return Err(Rejection::Cycle {
                source: *source,
                target: *target,
            });
        }

        let source_port = source_handle
            .as_deref()
            .and_then(|handle| source_node.output_port(handle));
        let target_port = target_handle
            .as_deref()
            .and_then(|handle| target_node.input_port(handle));

        if let (Some(out), Some(inp)) = (source_port, target_port)
            && !out.port_type.is_compatible_with(&inp.port_type)
        {
            return Err(Rejection::TypeMismatch {
                source_port: out.id.clone(),
                source_type: out.port_type,
                target_port: inp.id.clone(),
                target_type: inp.port_type,
            });
        }

        let accepts_many = target_port.is_some_and(|port| port.multiple);
        if !accepts_many
            && graph
                .edges()
                .iter()
                .any(|edge| edge.ends_at(*target, target_handle.as_deref()))
        {
            return Err(Rejection::ArityExceeded {
                node_id: *target,
                port: target_handle.clone(),
            });
        }

        if graph
            .edges()
            .iter()
            .any(|edge| edge.connection() == *connection)
        {
            return Err(Rejection::Duplicate);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::node::{Node, NodeData, NodeKind, Position};
    use crate::port::{Port, PortType};
    use flowcanvas_core::{EdgeId, NodeId};

    fn node_with_ports(inputs: Vec<Port>, outputs: Vec<Port>) -> Node {
        let mut data = NodeKind::Code.default_data(None);
        data.inputs = inputs;
        data.outputs = outputs;
        Node::from_data(NodeId::new(), Position::default(), data)
    }

    fn passthrough() -> Node {
        node_with_ports(
            vec![Port::input("in", "in", PortType::Any)],
            vec![Port::output("out", "out", PortType::Any)],
        )
    }

    fn connect(graph: &mut WorkflowGraph, source: &Node, target: &Node) {
        let connection = Connection::new(source.id, "out", target.id, "in");
        assert!(ConnectionValidator::check(graph, &connection).is_accepted());
        graph.push_edge(Edge::new(EdgeId::new(), connection));
    }

    #[test]
    fn accepts_any_into_string() {
        let a = node_with_ports(vec![], vec![Port::output("out", "out", PortType::Any)]);
        let b = node_with_ports(vec![Port::input("in", "in", PortType::String)], vec![]);
        let graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone()], vec![]);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(a.id, "out", b.id, "in"));
        assert_eq!(verdict, Verdict::Accepted);
    }

    #[test]
    fn rejects_self_loop() {
        let a = passthrough();
        let graph = WorkflowGraph::from_parts(vec![a.clone()], vec![]);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(a.id, "out", a.id, "in"));
        assert!(matches!(verdict, Verdict::Rejected(Rejection::SelfLoop { .. })));
    }

    #[test]
    fn rejects_missing_endpoint() {
        let a = passthrough();
        let graph = WorkflowGraph::from_parts(vec![a.clone()], vec![]);
        let ghost = NodeId::new();

        let connection = Connection::new(a.id, "out", ghost, "in");
        let verdict = ConnectionValidator::check(&graph, &connection);
        assert_eq!(
            verdict.rejection(),
            Some(&Rejection::MissingEndpoint { node_id: ghost })
        );
    }

    #[test]
    fn rejects_closing_a_cycle() {
        let (a, b, c) = (passthrough(), passthrough(), passthrough());
        let mut graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone(), c.clone()], vec![]);
        connect(&mut graph, &a, &b);
        connect(&mut graph, &b, &c);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(c.id, "out", a.id, "in"));
        assert_eq!(verdict.rejection().map(Rejection::rule), Some("cycle"));
    }

    #[test]
    fn rejects_direct_back_edge() {
        let (a, b) = (passthrough(), passthrough());
        let mut graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone()], vec![]);
        connect(&mut graph, &a, &b);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(b.id, "out", a.id, "in"));
        assert_eq!(verdict.rejection().map(Rejection::rule), Some("cycle"));
    }

    #[test]
    fn rejects_type_mismatch() {
        let a = node_with_ports(vec![], vec![Port::output("out", "out", PortType::Number)]);
        let b = node_with_ports(vec![Port::input("in", "in", PortType::String)], vec![]);
        let graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone()], vec![]);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(a.id, "out", b.id, "in"));
        assert_eq!(verdict.rejection().map(Rejection::rule), Some("type_mismatch"));
    }

    #[test]
    fn undeclared_handle_is_passthrough() {
        let a = node_with_ports(vec![], vec![Port::output("out", "out", PortType::Number)]);
        let b = node_with_ports(vec![Port::input("in", "in", PortType::String)], vec![]);
        let graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone()], vec![]);

        let verdict =
            ConnectionValidator::check(&graph, &Connection::new(a.id, "unknown", b.id, "in"));
        assert!(verdict.is_accepted());
    }

    #[test]
    fn rejects_second_edge_into_single_port() {
        let (a, b, c) = (passthrough(), passthrough(), passthrough());
        let mut graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone(), c.clone()], vec![]);
        connect(&mut graph, &a, &b);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(c.id, "out", b.id, "in"));
        assert_eq!(verdict.rejection().map(Rejection::rule), Some("arity"));
    }

    #[test]
    fn multiple_port_accepts_many() {
        let (a, c) = (passthrough(), passthrough());
        let b = node_with_ports(
            vec![Port::input("in", "in", PortType::Any).multiple()],
            vec![],
        );
        let mut graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone(), c.clone()], vec![]);
        connect(&mut graph, &a, &b);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(c.id, "out", b.id, "in"));
        assert!(verdict.is_accepted());
    }

    #[test]
    fn multiple_port_rejects_exact_duplicate() {
        let a = passthrough();
        let b = node_with_ports(
            vec![Port::input("in", "in", PortType::Any).multiple()],
            vec![],
        );
        let mut graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone()], vec![]);
        connect(&mut graph, &a, &b);

        let verdict = ConnectionValidator::check(&graph, &Connection::new(a.id, "out", b.id, "in"));
        assert_eq!(verdict, Verdict::Rejected(Rejection::Duplicate));
    }

    #[test]
    fn untyped_nodes_connect() {
        let mut data = NodeData {
            label: "bare".to_string(),
            description: None,
            icon: None,
            config: NodeKind::Start.default_config(),
            inputs: vec![],
            outputs: vec![],
        };
        let a = Node::from_data(NodeId::new(), Position::default(), data.clone());
        data.label = "other".to_string();
        let b = Node::from_data(NodeId::new(), Position::default(), data);
        let graph = WorkflowGraph::from_parts(vec![a.clone(), b.clone()], vec![]);

        let verdict = ConnectionValidator::check(&graph, &Connection::untyped(a.id, b.id));
        assert!(verdict.is_accepted());
    }
}
