//! Error types for editor operations and configuration.

use thiserror::Error;

use crate::editor::EdgeId;
use crate::graph::NodeId;

/// Why an editor operation was refused.
///
/// Every refusal leaves the graph exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("node '{0}' not found")]
    UnknownNode(NodeId),

    #[error("edge '{0}' not found")]
    UnknownEdge(EdgeId),

    #[error("node id '{0}' is already in use")]
    DuplicateNode(NodeId),

    #[error("cannot connect node '{0}' to itself")]
    SelfLoop(NodeId),

    /// The edge would close a directed cycle. `cycle` lists the nodes on it,
    /// starting from `to`.
    #[error("edge '{from}' -> '{to}' would create a cycle")]
    WouldCreateCycle {
        from: NodeId,
        to: NodeId,
        cycle: Vec<NodeId>,
    },
}

/// Invalid editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
