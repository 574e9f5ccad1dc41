//! Plain value types describing a graph at one instant.
//!
//! A [`Snapshot`] is what the interaction layer hands to the checker: the node
//! identifiers it currently shows plus the edges between them. Snapshots are
//! built fresh for every check and own no rendering state.
//!
//! ## Performance Characteristics
//!
//! - **Node insertion**: O(1) amortized, duplicates ignored via an id→index map
//! - **Edge insertion**: O(1) amortized, parallel edges kept as-is
//! - **Cycle check**: O(V + E), see [`crate::cycles`]

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cycles;

/// Opaque node identifier, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A directed edge `source -> target`.
///
/// # Examples
///
/// ```
/// use flowdag::graph::Edge;
///
/// let edge: Edge<&str> = Edge::new("a", "b");
/// assert!(!edge.is_self_loop());
/// assert!(Edge::<&str>::new("a", "a").is_self_loop());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge<Id = NodeId> {
    pub source: Id,
    pub target: Id,
}

impl<Id> Edge<Id> {
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Edge with source and target swapped.
    pub fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl<Id: PartialEq> Edge<Id> {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl<Id> From<(Id, Id)> for Edge<Id> {
    fn from((source, target): (Id, Id)) -> Self {
        Self { source, target }
    }
}

/// Node identifiers plus the edges between them, captured at one instant.
///
/// Nodes are kept in insertion order and deduplicated. Edges are kept exactly
/// as given, including parallel edges and edges whose endpoints were never
/// added as nodes.
///
/// # Examples
///
/// ```
/// use flowdag::graph::{Edge, Snapshot};
///
/// let snapshot = Snapshot::from_edges(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
///
/// assert!(snapshot.would_create_cycle(Some(&Edge::new("c", "a"))));
/// assert!(!snapshot.would_create_cycle(Some(&Edge::new("a", "c"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "SnapshotParts<Id>",
    bound(
        serialize = "Id: Serialize",
        deserialize = "Id: Deserialize<'de> + Eq + Hash + Clone"
    )
)]
pub struct Snapshot<Id = NodeId>
where
    Id: Eq + Hash + Clone,
{
    nodes: Vec<Id>,
    edges: Vec<Edge<Id>>,
    #[serde(skip)]
    id_to_index: HashMap<Id, usize>,
}

/// Wire shape of a snapshot; the index map is rebuilt on load.
#[derive(Deserialize)]
#[serde(bound = "Id: Deserialize<'de>")]
struct SnapshotParts<Id> {
    #[serde(default)]
    nodes: Vec<Id>,
    #[serde(default)]
    edges: Vec<Edge<Id>>,
}

impl<Id: Eq + Hash + Clone> From<SnapshotParts<Id>> for Snapshot<Id> {
    fn from(parts: SnapshotParts<Id>) -> Self {
        Self::from_parts(parts.nodes, parts.edges)
    }
}

impl<Id: Eq + Hash + Clone> Default for Snapshot<Id> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }
}

impl<Id: Eq + Hash + Clone> Snapshot<Id> {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from owned node and edge lists.
    pub fn from_parts(nodes: impl IntoIterator<Item = Id>, edges: Vec<Edge<Id>>) -> Self {
        let mut snapshot = Self {
            edges,
            ..Self::default()
        };
        for id in nodes {
            snapshot.add_node(id);
        }
        snapshot
    }

    /// Batch construction from borrowed node ids and `(source, target)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowdag::graph::Snapshot;
    ///
    /// let snapshot = Snapshot::from_edges(&["a", "b"], &[("a", "b")]);
    /// assert_eq!(snapshot.node_count(), 2);
    /// assert_eq!(snapshot.edge_count(), 1);
    /// ```
    pub fn from_edges(nodes: &[Id], edges: &[(Id, Id)]) -> Self {
        let edges = edges.iter().cloned().map(Edge::from).collect();
        Self::from_parts(nodes.iter().cloned(), edges)
    }

    /// Add a node. Returns `false` if the id was already present.
    pub fn add_node(&mut self, id: Id) -> bool {
        if self.id_to_index.contains_key(&id) {
            return false;
        }
        self.id_to_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(id);
        true
    }

    /// Add an edge. Endpoints are not required to be known nodes.
    pub fn add_edge(&mut self, source: Id, target: Id) {
        self.edges.push(Edge { source, target });
    }

    pub fn contains_node(&self, id: &Id) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge<Id>] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Would adding `candidate` (or, with `None`, the edges as they stand)
    /// produce a directed cycle?
    pub fn would_create_cycle(&self, candidate: Option<&Edge<Id>>) -> bool {
        cycles::would_create_cycle(&self.nodes, &self.edges, candidate)
    }

    /// Check the committed edges alone.
    pub fn has_cycle(&self) -> bool {
        self.would_create_cycle(None)
    }

    /// One cycle through the graph plus `candidate`, if any.
    pub fn find_cycle(&self, candidate: Option<&Edge<Id>>) -> Option<Vec<Id>> {
        cycles::find_cycle(&self.nodes, &self.edges, candidate)
    }
}

impl<Id> Snapshot<Id>
where
    Id: Eq + Hash + Clone + Serialize + DeserializeOwned,
{
    /// Parse a `{ "nodes": [...], "edges": [...] }` document.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowdag::graph::{NodeId, Snapshot};
    ///
    /// let json = r#"{
    ///     "nodes": ["n1", "n2"],
    ///     "edges": [{ "source": "n1", "target": "n2" }]
    /// }"#;
    /// let snapshot: Snapshot<NodeId> = Snapshot::from_json(json).unwrap();
    /// assert_eq!(snapshot.edge_count(), 1);
    /// assert!(!snapshot.has_cycle());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
