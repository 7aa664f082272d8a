//! Port system for workflow nodes.
//!
//! Ports are named connection points on nodes. Each port declares the data
//! type it accepts (input) or produces (output).
//!
//! Connections between ports are valid if their types are compatible.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// The data type carried through a port.
///
/// A port that does not declare a type is treated as `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    #[default]
    Any,
}

impl PortType {
    /// Returns the lowercase name used in snapshots and messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
        }
    }

    /// Checks if data of this type may flow into a port of `other` type.
    ///
    /// `Any` is compatible with every type in both directions; otherwise the
    /// types must be identical.
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        matches!(self, Self::Any) || matches!(other, Self::Any) || self == other
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A port on a workflow node.
///
/// The same shape is used for inputs and outputs; `required` and `multiple`
/// only carry meaning on inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Identifier of this port, unique within its node. Edge handles refer to it.
    pub id: String,
    /// Display name of this port.
    pub name: String,
    /// The data type of this port.
    #[serde(rename = "type", default)]
    pub port_type: PortType,
    /// Whether this input must have an incoming edge.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Whether this input accepts more than one incoming edge.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
    /// Value used when nothing is connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
}

impl Port {
    /// Creates a new optional, single-arity input port.
    #[must_use]
    pub fn input(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            port_type,
            required: false,
            multiple: false,
            default_value: None,
        }
    }

    /// Creates a new output port.
    #[must_use]
    pub fn output(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self::input(id, name, port_type)
    }

    /// Marks this input as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allows this input to accept more than one incoming edge.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}
