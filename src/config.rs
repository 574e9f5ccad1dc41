//! Editor configuration.
//!
//! A config can be loaded from JSON; every field is optional and falls back to
//! [`EditorConfig::default`].
//!
//! ```
//! use flowdag::config::{EdgePolicy, EditorConfig};
//!
//! let config = EditorConfig::from_json(r#"{ "edge_policy": "rollback" }"#).unwrap();
//! assert_eq!(config.edge_policy, EdgePolicy::Rollback);
//! assert_eq!(config.label_prefix, "Node");
//! ```

use serde::{Deserialize, Serialize};

use crate::editor::Position;
use crate::error::ConfigError;

/// When the cycle check runs relative to committing an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Check the candidate before the edge exists. A rejected edge is never
    /// visible.
    #[default]
    Gate,

    /// Commit the edge, check the graph, and remove the edge again if it
    /// closed a cycle.
    Rollback,
}

/// Settings for a [`FlowGraph`](crate::editor::FlowGraph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub edge_policy: EdgePolicy,

    /// New nodes are labelled `"<label_prefix> <n>"`.
    pub label_prefix: String,

    /// Where nodes land when the graph is empty, and where image nodes land
    /// when no position is given.
    pub canvas_center: Position,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::Gate,
            label_prefix: "Node".to_string(),
            canvas_center: Position::default(),
        }
    }
}

impl EditorConfig {
    pub fn with_policy(edge_policy: EdgePolicy) -> Self {
        Self {
            edge_policy,
            ..Self::default()
        }
    }

    /// Reject settings the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("label_prefix must not be blank".to_string()));
        }
        if !self.canvas_center.x.is_finite() || !self.canvas_center.y.is_finite() {
            return Err(ConfigError::Invalid("canvas_center must be finite".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
