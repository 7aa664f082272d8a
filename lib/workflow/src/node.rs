//! Workflow node types and configurations.
//!
//! Nodes are the building blocks of workflows. Each node has:
//! - A unique ID, stable for the editor session
//! - A position on the canvas
//! - Configuration specific to its kind
//! - Input and output ports
//!
//! A palette drop builds a node from [`NodeKind::default_data`], the per-kind
//! factory for label, configuration, and ports.

use crate::port::{Port, PortType};
use flowcanvas_core::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Width assumed for a node frame when laying out or grouping.
pub const DEFAULT_NODE_WIDTH: f64 = 280.0;
/// Height assumed for a node frame when laying out or grouping.
pub const DEFAULT_NODE_HEIGHT: f64 = 120.0;

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `delta`.
    #[must_use]
    pub fn offset(self, delta: Position) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Returns this position relative to `origin`.
    #[must_use]
    pub fn relative_to(self, origin: Position) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Width and height of a frame on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// The kind of a workflow node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    End,
    Llm,
    Http,
    Condition,
    Loop,
    Code,
    Template,
    Variable,
    Input,
    Output,
    DbSelect,
    DbInsert,
    DbUpdate,
    DbDelete,
    DbMigrate,
    Group,
}

impl NodeKind {
    /// Returns the snake_case tag used in snapshots.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Llm => "llm",
            Self::Http => "http",
            Self::Condition => "condition",
            Self::Loop => "loop",
            Self::Code => "code",
            Self::Template => "template",
            Self::Variable => "variable",
            Self::Input => "input",
            Self::Output => "output",
            Self::DbSelect => "db_select",
            Self::DbInsert => "db_insert",
            Self::DbUpdate => "db_update",
            Self::DbDelete => "db_delete",
            Self::DbMigrate => "db_migrate",
            Self::Group => "group",
        }
    }

    /// Returns the label a freshly dropped node of this kind carries.
    #[must_use]
    pub const fn default_label(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
            Self::Llm => "LLM Call",
            Self::Http => "HTTP Request",
            Self::Condition => "Condition",
            Self::Loop => "Loop",
            Self::Code => "Code",
            Self::Template => "Text Template",
            Self::Variable => "Variable",
            Self::Input => "Form Input",
            Self::Output => "Result Output",
            Self::DbSelect => "DB Query",
            Self::DbInsert => "DB Insert",
            Self::DbUpdate => "DB Update",
            Self::DbDelete => "DB Delete",
            Self::DbMigrate => "DB Migrate",
            Self::Group => "New Group",
        }
    }

    /// Returns the default configuration for this kind.
    #[must_use]
    pub fn default_config(&self) -> NodeConfig {
        match self {
            Self::Start => NodeConfig::Start,
            Self::End => NodeConfig::End,
            Self::Llm => NodeConfig::Llm {
                model: "gpt-4".to_string(),
                system_prompt: String::new(),
                user_prompt: String::new(),
                temperature: 0.7,
                max_tokens: 2048,
            },
            Self::Http => NodeConfig::Http {
                method: HttpMethod::Get,
                url: String::new(),
                headers: BTreeMap::new(),
                body: None,
            },
            Self::Condition => NodeConfig::Condition {
                conditions: Vec::new(),
                logic: ConditionLogic::And,
            },
            Self::Loop => NodeConfig::Loop {
                mode: LoopMode::ForEach,
                max_iterations: 1000,
            },
            Self::Code => NodeConfig::Code {
                language: "javascript".to_string(),
                code: "async function main(inputs) {\n  return { output: inputs };\n}".to_string(),
                timeout_ms: 30_000,
            },
            Self::Template => NodeConfig::Template {
                template: String::new(),
            },
            Self::Variable => NodeConfig::Variable {
                variable_name: "myVar".to_string(),
                value_type: PortType::String,
                value: JsonValue::String(String::new()),
            },
            Self::Input => NodeConfig::Input {
                input_type: "text".to_string(),
                name: "input".to_string(),
                label: "User Input".to_string(),
                placeholder: String::new(),
                required: true,
            },
            Self::Output => NodeConfig::Output {
                output_type: "text".to_string(),
                title: "Result".to_string(),
                show_timestamp: false,
            },
            Self::DbSelect => NodeConfig::DbSelect {
                table: "table_name".to_string(),
                filter: String::new(),
                limit: 100,
            },
            Self::DbInsert => NodeConfig::DbInsert {
                table: "table_name".to_string(),
                values: serde_json::json!({ "field": "value" }),
            },
            Self::DbUpdate => NodeConfig::DbUpdate {
                table: "table_name".to_string(),
                filter: String::new(),
                values: serde_json::json!({ "field": "value" }),
            },
            Self::DbDelete => NodeConfig::DbDelete {
                table: "table_name".to_string(),
                filter: String::new(),
            },
            Self::DbMigrate => NodeConfig::DbMigrate {
                sql: "CREATE TABLE example (id INT PRIMARY KEY);".to_string(),
            },
            Self::Group => NodeConfig::Group {
                collapsed: false,
                color: GroupColor::Default,
            },
        }
    }

    /// Generates the default ports for this kind as `(inputs, outputs)`.
    #[must_use]
    pub fn default_ports(&self) -> (Vec<Port>, Vec<Port>) {
        match self {
            Self::Start => (vec![], vec![Port::output("output", "output", PortType::Any)]),
            Self::End => (
                vec![Port::input("input", "input", PortType::Any).required()],
                vec![],
            ),
            Self::Llm => (
                vec![Port::input("input", "Input", PortType::Any)],
                vec![Port::output("output", "Output", PortType::String)],
            ),
            Self::Http => (
                vec![Port::input("input", "Input", PortType::Any)],
                vec![Port::output("output", "Response", PortType::Any)],
            ),
            // Branch outputs carry no declared type of their own.
            Self::Condition => (
                vec![Port::input("input", "Input", PortType::Any).required()],
                vec![
                    Port::output("true", "True", PortType::Any),
                    Port::output("false", "False", PortType::Any),
                ],
            ),
            Self::Loop => (
                vec![Port::input("input", "Input", PortType::Array).required()],
                vec![
                    Port::output("loop", "Loop Body", PortType::Any),
                    Port::output("done", "Done", PortType::Array),
                ],
            ),
            Self::Code | Self::Variable => (
                vec![Port::input("input", "Input", PortType::Any)],
                vec![Port::output("output", "Output", PortType::Any)],
            ),
            Self::Template => (
                vec![Port::input("input", "Variables", PortType::Object)],
                vec![Port::output("output", "Text", PortType::String)],
            ),
            Self::Input => (vec![], vec![Port::output("output", "Output", PortType::Any)]),
            Self::Output => (
                vec![Port::input("input", "Input", PortType::Any).required()],
                vec![],
            ),
            Self::DbSelect => (
                vec![Port::input("params", "Params", PortType::Object)],
                vec![
                    Port::output("rows", "rows", PortType::Array),
                    Port::output("count", "count", PortType::Number),
                ],
            ),
            Self::DbInsert => (
                vec![Port::input("values", "values", PortType::Object)],
                vec![
                    Port::output("insertedId", "insertedId", PortType::String),
                    Port::output("rowsAffected", "rowsAffected", PortType::Number),
                ],
            ),
            Self::DbUpdate => (
                vec![Port::input("values", "values", PortType::Object)],
                vec![Port::output("rowsAffected", "rowsAffected", PortType::Number)],
            ),
            Self::DbDelete => (
                vec![Port::input("params", "Params", PortType::Object)],
                vec![Port::output("rowsAffected", "rowsAffected", PortType::Number)],
            ),
            Self::DbMigrate => (
                vec![Port::input("sql", "sql", PortType::String)],
                vec![
                    Port::output("applied", "applied", PortType::Boolean),
                    Port::output("appliedCount", "appliedCount", PortType::Number),
                ],
            ),
            Self::Group => (vec![], vec![]),
        }
    }

    /// Builds the default node data for a palette drop of this kind.
    ///
    /// An empty `label` falls back to the kind's default label.
    #[must_use]
    pub fn default_data(&self, label: Option<&str>) -> NodeData {
        let (inputs, outputs) = self.default_ports();
        let label = label
            .filter(|l| !l.is_empty())
            .unwrap_or(self.default_label());
        NodeData {
            label: label.to_string(),
            description: None,
            icon: None,
            config: self.default_config(),
            inputs,
            outputs,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method for request nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// How the rules of a condition node combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionLogic {
    #[default]
    And,
    Or,
}

/// A single comparison evaluated by a condition node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule {
    /// Path of the value being compared.
    pub field: String,
    /// Comparison operator (e.g., "equals", "contains").
    pub operator: String,
    /// The value compared against.
    pub value: JsonValue,
}

/// Iteration mode for loop nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoopMode {
    #[default]
    ForEach,
    While,
}

/// Color of a group frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    #[default]
    Default,
    Violet,
    Blue,
    Emerald,
    Amber,
    Rose,
    Orange,
    Cyan,
}

/// Configuration for a node, varying by kind.
///
/// The `type` tag doubles as the node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NodeConfig {
    /// Entry point of the workflow.
    Start,
    /// Terminal node of the workflow.
    End,
    /// Single LLM inference.
    Llm {
        model: String,
        system_prompt: String,
        user_prompt: String,
        temperature: f64,
        max_tokens: u32,
    },
    /// Outbound HTTP request.
    Http {
        method: HttpMethod,
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
        #[serde(default)]
        body: Option<JsonValue>,
    },
    /// Two-way branch on a set of rules.
    Condition {
        #[serde(default)]
        conditions: Vec<ConditionRule>,
        #[serde(default)]
        logic: ConditionLogic,
    },
    /// Iteration over an array input.
    Loop { mode: LoopMode, max_iterations: u32 },
    /// Sandboxed custom code.
    Code {
        language: String,
        code: String,
        timeout_ms: u64,
    },
    /// Text template rendered from variables.
    Template { template: String },
    /// Named workflow variable.
    Variable {
        variable_name: String,
        value_type: PortType,
        value: JsonValue,
    },
    /// Form field collected from the user.
    Input {
        input_type: String,
        name: String,
        label: String,
        #[serde(default)]
        placeholder: String,
        #[serde(default)]
        required: bool,
    },
    /// Result shown to the user.
    Output {
        output_type: String,
        title: String,
        #[serde(default)]
        show_timestamp: bool,
    },
    DbSelect {
        table: String,
        #[serde(rename = "where", default)]
        filter: String,
        limit: u32,
    },
    DbInsert { table: String, values: JsonValue },
    DbUpdate {
        table: String,
        #[serde(rename = "where", default)]
        filter: String,
        values: JsonValue,
    },
    DbDelete {
        table: String,
        #[serde(rename = "where", default)]
        filter: String,
    },
    DbMigrate { sql: String },
    /// Frame owning child nodes.
    Group {
        #[serde(default)]
        collapsed: bool,
        #[serde(default)]
        color: GroupColor,
    },
}

impl NodeConfig {
    /// Returns the kind of this node configuration.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Start => NodeKind::Start,
            Self::End => NodeKind::End,
            Self::Llm { .. } => NodeKind::Llm,
            Self::Http { .. } => NodeKind::Http,
            Self::Condition { .. } => NodeKind::Condition,
            Self::Loop { .. } => NodeKind::Loop,
            Self::Code { .. } => NodeKind::Code,
            Self::Template { .. } => NodeKind::Template,
            Self::Variable { .. } => NodeKind::Variable,
            Self::Input { .. } => NodeKind::Input,
            Self::Output { .. } => NodeKind::Output,
            Self::DbSelect { .. } => NodeKind::DbSelect,
            Self::DbInsert { .. } => NodeKind::DbInsert,
            Self::DbUpdate { .. } => NodeKind::DbUpdate,
            Self::DbDelete { .. } => NodeKind::DbDelete,
            Self::DbMigrate { .. } => NodeKind::DbMigrate,
            Self::Group { .. } => NodeKind::Group,
        }
    }
}

/// The editable payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Human-readable label shown on the canvas.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Node configuration (determines kind and behavior).
    pub config: NodeConfig,
    /// Input ports for this node.
    #[serde(default)]
    pub inputs: Vec<Port>,
    /// Output ports for this node.
    #[serde(default)]
    pub outputs: Vec<Port>,
}

/// A workflow node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Position on the canvas; relative to the parent group when `parent_id` is set.
    pub position: Position,
    pub data: NodeData,
    /// The group frame owning this node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Set while the owning group is collapsed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Frame size, used by group nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl Node {
    /// Creates a node of the given kind with default data and a random ID.
    #[must_use]
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self::with_id(NodeId::new(), kind, position)
    }

    /// Creates a node of the given kind with default data and a specific ID.
    #[must_use]
    pub fn with_id(id: NodeId, kind: NodeKind, position: Position) -> Self {
        Self::from_data(id, position, kind.default_data(None))
    }

    /// Creates a node from explicit data.
    #[must_use]
    pub fn from_data(id: NodeId, position: Position, data: NodeData) -> Self {
        Self {
            id,
            position,
            data,
            parent_id: None,
            hidden: false,
            size: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data.config.kind()
    }

    /// Returns true for group frames.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind() == NodeKind::Group
    }

    /// Returns the input port with the given ID, if any.
    #[must_use]
    pub fn input_port(&self, id: &str) -> Option<&Port> {
        self.data.inputs.iter().find(|p| p.id == id)
    }

    /// Returns the output port with the given ID, if any.
    #[must_use]
    pub fn output_port(&self, id: &str) -> Option<&Port> {
        self.data.outputs.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_node_has_no_inputs() {
        let node = Node::new(NodeKind::Start, Position::default());
        assert!(node.data.inputs.is_empty());
        assert_eq!(node.data.outputs.len(), 1);
        assert_eq!(node.data.outputs[0].id, "output");
        assert_eq!(node.data.label, "Start");
    }

    #[test]
    fn condition_node_has_untyped_branches() {
        let node = Node::new(NodeKind::Condition, Position::default());
        let ids: Vec<_> = node.data.outputs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["true", "false"]);
        assert!(node.data.outputs.iter().all(|p| p.port_type == PortType::Any));
    }

    #[test]
    fn loop_node_takes_array() {
        let node = Node::new(NodeKind::Loop, Position::default());
        let input = node.input_port("input").expect("input port");
        assert_eq!(input.port_type, PortType::Array);
        assert!(input.required);
        assert_eq!(
            node.output_port("done").map(|p| p.port_type),
            Some(PortType::Array)
        );
    }

    #[test]
    fn kind_follows_config() {
        for kind in [NodeKind::Llm, NodeKind::DbSelect, NodeKind::Group] {
            assert_eq!(kind.default_config().kind(), kind);
        }
    }

    #[test]
    fn default_data_uses_given_label() {
        let data = NodeKind::Http.default_data(Some("Fetch weather"));
        assert_eq!(data.label, "Fetch weather");

        let data = NodeKind::Http.default_data(Some(""));
        assert_eq!(data.label, "HTTP Request");
    }

    #[test]
    fn config_tag_is_node_type() {
        let node = Node::new(NodeKind::DbSelect, Position::new(10.0, 20.0));
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["data"]["config"]["type"], "db_select");
        assert_eq!(json["data"]["config"]["where"], "");
        assert!(json.get("parentId").is_none());
    }

    #[test]
    fn node_serde_roundtrip() {
        let node = Node::new(NodeKind::Llm, Position::new(1.5, -3.0)).with_label("Summarize");
        let json = serde_json::to_string(&node).expect("serialize");
        let parsed: Node = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(node, parsed);
    }
}
