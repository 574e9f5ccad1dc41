//! # flowdag
//!
//! DAG validity checking for node-based flow editors, plus a headless editor
//! model that keeps its graph acyclic.
//!
//! ## Features
//!
//! - **Pure**: the checker is a free function over plain values, no state
//! - **Fast**: O(V + E) depth-first search with an explicit stack
//! - **Forgiving**: unknown endpoints, parallel edges and self-loops are all
//!   handled without panicking
//! - **Adaptable**: closure and trait adapters for caller-owned graphs
//!
//! ## Quick Start
//!
//! ```rust
//! use flowdag::{would_create_cycle, Edge};
//!
//! let nodes = ["ingest", "transform", "publish"];
//! let edges = [
//!     Edge::new("ingest", "transform"),
//!     Edge::new("transform", "publish"),
//! ];
//!
//! assert!(would_create_cycle(&nodes, &edges, Some(&Edge::new("publish", "ingest"))));
//! assert!(!would_create_cycle(&nodes, &edges, Some(&Edge::new("ingest", "publish"))));
//! ```
//!
//! ## Editor Model
//!
//! ```rust
//! use flowdag::{EditorConfig, FlowGraph};
//!
//! let mut graph = FlowGraph::with_starter_elements(EditorConfig::default());
//! let report = graph.add_node(None);
//!
//! let ingest = "n1".into();
//! let transform = "n2".into();
//! graph.connect(&transform, &report).unwrap();
//!
//! // Dragging from the last step back to the first is refused.
//! assert!(!graph.can_connect(&report, &ingest));
//! ```

pub mod config;
pub mod cycles;
pub mod editor;
pub mod error;
pub mod graph;

pub use config::{EdgePolicy, EditorConfig};
pub use cycles::generic::GraphSource;
pub use cycles::{find_cycle, would_create_cycle};
pub use editor::{EdgeId, Element, FlowEdge, FlowGraph, FlowNode, Position};
pub use error::{ConfigError, EditError};
pub use graph::{Edge, NodeId, Snapshot};
