//! Strongly-typed ID types for graph entities.
//!
//! All IDs use ULID (Universally Unique Lexicographically Sortable Identifier) format,
//! providing both uniqueness and temporal ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::{Generator, Ulid};

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed ID wrapper around ULID.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Creates a new ID with a randomly generated ULID.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Creates an ID from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }

            /// Returns the prefix used for display formatting.
            #[must_use]
            pub const fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let prefix_with_underscore = concat!($prefix, "_");
                let ulid_str = s.strip_prefix(prefix_with_underscore).unwrap_or(s);

                Ulid::from_str(ulid_str)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        reason: e.to_string(),
                    })
            }
        }

        impl From<Ulid> for $name {
            fn from(ulid: Ulid) -> Self {
                Self(ulid)
            }
        }

        impl From<$name> for Ulid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a node on the canvas.
    NodeId,
    "node"
);

define_id!(
    /// Unique identifier for an edge between two ports.
    EdgeId,
    "edge"
);

define_id!(
    /// Unique identifier for a workflow definition.
    WorkflowId,
    "wf"
);

/// Hands out fresh IDs for one editor session.
///
/// IDs are strictly increasing within the session, so repeated pastes or
/// palette drops landing in the same millisecond never collide.
pub struct IdGenerator {
    inner: Generator,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

impl IdGenerator {
    /// Creates a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Generator::new(),
        }
    }

    /// Returns the next ID, converted into the requested ID type.
    pub fn next_id<I: From<Ulid>>(&mut self) -> I {
        // Overflow only happens after 2^80 IDs in one millisecond.
        let ulid = self.inner.generate().unwrap_or_else(|_| Ulid::new());
        I::from(ulid)
    }

    /// Returns a fresh node ID.
    pub fn node_id(&mut self) -> NodeId {
        self.next_id()
    }

    /// Returns a fresh edge ID.
    pub fn edge_id(&mut self) -> EdgeId {
        self.next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_id_display_format() {
        let id = NodeId::new();
        assert!(id.to_string().starts_with("node_"));
    }

    #[test]
    fn edge_id_display_format() {
        let id = EdgeId::new();
        assert!(id.to_string().starts_with("edge_"));
    }

    #[test]
    fn parse_with_prefix() {
        let id = NodeId::new();
        let parsed: NodeId = id.to_string().parse().expect("should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_without_prefix() {
        let ulid = Ulid::new();
        let id: EdgeId = ulid.to_string().parse().expect("should parse");
        assert_eq!(id.as_ulid(), ulid);
    }

    #[test]
    fn parse_invalid_ulid() {
        let err = "not_a_ulid".parse::<WorkflowId>().unwrap_err();
        assert_eq!(err.id_type, "WorkflowId");
    }

    #[test]
    fn generator_never_repeats() {
        let mut ids = IdGenerator::new();
        let generated: HashSet<NodeId> = (0..1000).map(|_| ids.node_id()).collect();
        assert_eq!(generated.len(), 1000);
    }

    #[test]
    fn generator_is_monotonic() {
        let mut ids = IdGenerator::new();
        let first = ids.edge_id();
        let second = ids.edge_id();
        assert!(second > first);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = NodeId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        let parsed: NodeId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }
}
