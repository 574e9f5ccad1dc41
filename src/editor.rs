//! Headless model of a node-based flow editor.
//!
//! [`FlowGraph`] owns the elements a canvas displays (labelled nodes, image
//! nodes and directed edges) and keeps them a valid DAG: every new edge goes
//! through the cycle check before it is allowed to stay. Rendering, gestures
//! and styling belong to the caller; this type only answers "may I?" and
//! records the result.
//!
//! ```
//! use flowdag::editor::FlowGraph;
//! use flowdag::error::EditError;
//!
//! let mut graph = FlowGraph::default();
//! let load = graph.add_node(None);
//! let train = graph.add_node(None);
//!
//! graph.connect(&load, &train).unwrap();
//! assert!(matches!(
//!     graph.connect(&train, &load),
//!     Err(EditError::WouldCreateCycle { .. })
//! ));
//! assert_eq!(graph.edge_count(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::{EdgePolicy, EditorConfig};
use crate::cycles::generic::GraphSource;
use crate::error::EditError;
use crate::graph::{Edge, NodeId};

/// A point on the canvas, in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Mean of all points, `None` when there are none.
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Position>) -> Option<Position> {
        let (count, sum_x, sum_y) = points
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, x, y), p| (n + 1, x + p.x, y + p.y));
        if count == 0 {
            return None;
        }
        Some(Position::new(sum_x / count as f64, sum_y / count as f64))
    }
}

/// Edge identifier, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A block on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub label: String,
    /// Image source for image nodes, e.g. an object URL.
    pub image: Option<String>,
    pub position: Position,
}

impl FlowNode {
    pub fn is_image(&self) -> bool {
        self.image.is_some()
    }
}

/// A committed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl FlowEdge {
    /// The endpoints as a plain [`Edge`].
    pub fn as_edge(&self) -> Edge {
        Edge {
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }

    fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// Anything that can be selected and deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

/// Editor state: nodes, edges and the id sequence.
///
/// The edge set is acyclic after every public call returns.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    config: EditorConfig,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    node_index: HashMap<NodeId, usize>,
    seq: u64,
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FlowGraph {
    /// Create an empty editor.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
            seq: 0,
        }
    }

    /// Editor pre-filled with a two-step pipeline: `n1` "Ingest" feeding
    /// `n2` "Transform" through edge `e1`.
    ///
    /// The starter labels are fixed; only nodes added later use
    /// [`EditorConfig::label_prefix`]. Use [`rename`](Self::rename) to
    /// localize the seeded pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowdag::config::EditorConfig;
    /// use flowdag::editor::FlowGraph;
    ///
    /// let mut graph = FlowGraph::with_starter_elements(EditorConfig::default());
    /// assert_eq!(graph.node_count(), 2);
    /// assert_eq!(graph.edge_count(), 1);
    ///
    /// // Generated ids never collide with the seeded ones.
    /// assert_eq!(graph.add_node(None).as_str(), "n3");
    /// ```
    pub fn with_starter_elements(config: EditorConfig) -> Self {
        let mut graph = Self::new(config);
        graph.push_node(FlowNode {
            id: NodeId::from("n1"),
            label: "Ingest".to_string(),
            image: None,
            position: Position::new(160.0, 120.0),
        });
        graph.push_node(FlowNode {
            id: NodeId::from("n2"),
            label: "Transform".to_string(),
            image: None,
            position: Position::new(500.0, 320.0),
        });
        graph.edges.push(FlowEdge {
            id: EdgeId::from("e1"),
            source: NodeId::from("n1"),
            target: NodeId::from("n2"),
        });
        graph
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Add a block labelled `"<prefix> <n>"`.
    ///
    /// Without a position the node goes to the centroid of the existing
    /// nodes, or the configured canvas centre when the graph is empty.
    pub fn add_node(&mut self, position: Option<Position>) -> NodeId {
        let id = self.fresh_node_id("n");
        let label = format!("{} {}", self.config.label_prefix, self.nodes.len() + 1);
        let position = position
            .or_else(|| Position::centroid(self.nodes.iter().map(|n| &n.position)))
            .unwrap_or(self.config.canvas_center);

        debug!(node = %id, %label, "node added");
        self.push_node(FlowNode {
            id: id.clone(),
            label,
            image: None,
            position,
        });
        id
    }

    /// Add a block under a caller-chosen id.
    pub fn insert_node(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
        position: Position,
    ) -> Result<(), EditError> {
        if self.node_index.contains_key(&id) {
            return Err(EditError::DuplicateNode(id));
        }
        let label = label.into();
        debug!(node = %id, %label, "node inserted");
        self.push_node(FlowNode {
            id,
            label,
            image: None,
            position,
        });
        Ok(())
    }

    /// Add an unlabelled node that displays an image.
    ///
    /// Without a position the node goes to the canvas centre.
    pub fn add_image_node(&mut self, source: impl Into<String>, position: Option<Position>) -> NodeId {
        let id = self.fresh_node_id("img-");
        debug!(node = %id, "image node added");
        self.push_node(FlowNode {
            id: id.clone(),
            label: String::new(),
            image: Some(source.into()),
            position: position.unwrap_or(self.config.canvas_center),
        });
        id
    }

    /// Commit an inline edit of a node's label.
    ///
    /// The label is trimmed. A blank label leaves the node untouched and
    /// returns `Ok(false)`.
    pub fn rename(&mut self, id: &NodeId, label: &str) -> Result<bool, EditError> {
        let idx = self.require_node(id)?;
        let label = label.trim();
        if label.is_empty() {
            return Ok(false);
        }
        debug!(node = %id, label, "node renamed");
        self.nodes[idx].label = label.to_string();
        Ok(true)
    }

    /// May `source -> target` be drawn right now?
    ///
    /// This is the predicate to consult while a connect gesture is in
    /// progress. It never changes the graph.
    pub fn can_connect(&self, source: &NodeId, target: &NodeId) -> bool {
        self.node_index.contains_key(source)
            && self.node_index.contains_key(target)
            && source != target
            && !self.would_create_cycle(&Edge {
                source: source.clone(),
                target: target.clone(),
            })
    }

    /// Connect two nodes, keeping the graph acyclic.
    ///
    /// With [`EdgePolicy::Gate`] the candidate is checked first. With
    /// [`EdgePolicy::Rollback`] the edge is committed, the graph checked, and
    /// the edge removed again on failure. Either way a refused edge is not in
    /// the graph when this returns.
    #[instrument(level = "debug", skip(self))]
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, EditError> {
        self.require_node(source)?;
        self.require_node(target)?;
        if source == target {
            return Err(EditError::SelfLoop(source.clone()));
        }

        let candidate = Edge {
            source: source.clone(),
            target: target.clone(),
        };

        match self.config.edge_policy {
            EdgePolicy::Gate => {
                if let Some(cycle) = self.snapshot().find_cycle(Some(&candidate)) {
                    debug!(?cycle, "connection refused");
                    return Err(cycle_error(candidate, cycle));
                }
                Ok(self.commit_edge(candidate))
            }
            EdgePolicy::Rollback => {
                let id = self.commit_edge(candidate.clone());
                if let Some(cycle) = self.snapshot().find_cycle(None) {
                    self.edges.retain(|edge| edge.id != id);
                    warn!(edge = %id, ?cycle, "rolled back edge that closed a cycle");
                    return Err(cycle_error(candidate, cycle));
                }
                Ok(id)
            }
        }
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<(FlowNode, Vec<FlowEdge>), EditError> {
        let idx = self.require_node(id)?;
        let node = self.nodes.remove(idx);
        self.reindex();

        let (detached, kept) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|edge| edge.touches(id));
        self.edges = kept;

        debug!(node = %id, edges = detached.len(), "node removed");
        Ok((node, detached))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<FlowEdge, EditError> {
        let idx = self
            .edges
            .iter()
            .position(|edge| &edge.id == id)
            .ok_or_else(|| EditError::UnknownEdge(id.clone()))?;
        debug!(edge = %id, "edge removed");
        Ok(self.edges.remove(idx))
    }

    /// Delete a selection.
    ///
    /// Elements already gone are skipped, so an edge selected together with
    /// one of its nodes is removed once. Returns how many elements left the
    /// graph, including edges removed along with their nodes.
    pub fn remove(&mut self, selection: &[Element]) -> usize {
        let mut removed = 0;
        for element in selection {
            match element {
                Element::Node(id) => {
                    if let Ok((_, edges)) = self.remove_node(id) {
                        removed += 1 + edges.len();
                    }
                }
                Element::Edge(id) => {
                    if self.remove_edge(id).is_ok() {
                        removed += 1;
                    }
                }
            }
        }
        removed
    }

    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_acyclic(&self) -> bool {
        !self.has_cycle()
    }

    fn require_node(&self, id: &NodeId) -> Result<usize, EditError> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| EditError::UnknownNode(id.clone()))
    }

    fn push_node(&mut self, node: FlowNode) {
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn reindex(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();
    }

    fn commit_edge(&mut self, edge: Edge) -> EdgeId {
        let id = loop {
            self.seq += 1;
            let id = EdgeId::new(format!("e{}-{}-{}", edge.source, edge.target, self.seq));
            if self.edge(&id).is_none() {
                break id;
            }
        };
        debug!(edge = %id, "edge added");
        self.edges.push(FlowEdge {
            id: id.clone(),
            source: edge.source,
            target: edge.target,
        });
        id
    }

    fn fresh_node_id(&mut self, prefix: &str) -> NodeId {
        loop {
            self.seq += 1;
            let id = NodeId::new(format!("{prefix}{}", self.seq));
            if !self.node_index.contains_key(&id) {
                return id;
            }
        }
    }
}

impl GraphSource for FlowGraph {
    type Id = NodeId;

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    fn edge_list(&self) -> Vec<Edge> {
        self.edges.iter().map(FlowEdge::as_edge).collect()
    }
}

/// Build the refusal, listing the cycle from the candidate's target.
fn cycle_error(candidate: Edge, mut cycle: Vec<NodeId>) -> EditError {
    if let Some(start) = cycle.iter().position(|id| id == &candidate.target) {
        cycle.rotate_left(start);
    }
    EditError::WouldCreateCycle {
        from: candidate.source,
        to: candidate.target,
        cycle,
    }
}
