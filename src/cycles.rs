//! DAG validity checking.
//!
//! The entry point is [`would_create_cycle`]: given the node ids of a graph,
//! its committed edges and an optional candidate edge, it reports whether the
//! combined edge set contains a directed cycle. It is a pure function; all
//! traversal state lives for a single call.
//!
//! ```
//! use flowdag::cycles::would_create_cycle;
//! use flowdag::graph::Edge;
//!
//! let nodes = ["a", "b", "c"];
//! let edges = [Edge::new("a", "b"), Edge::new("b", "c")];
//!
//! // Closing the chain is rejected, a shortcut is fine.
//! assert!(would_create_cycle(&nodes, &edges, Some(&Edge::new("c", "a"))));
//! assert!(!would_create_cycle(&nodes, &edges, Some(&Edge::new("a", "c"))));
//! ```
//!
//! ## Generic Cycle Detection
//!
//! For graphs held in caller-owned structures, see the [`generic`] submodule
//! which works through closures or the [`GraphSource`](generic::GraphSource)
//! trait.

pub mod generic;

use std::collections::HashMap;
use std::hash::Hash;

use crate::graph::Edge;

/// Would the graph contain a directed cycle once `candidate` is added?
///
/// With `candidate = None` the committed `edges` are checked on their own.
/// Endpoints missing from `nodes` are treated as extra isolated nodes, so
/// malformed input never panics. Parallel edges are allowed and do not change
/// the result. A self-loop always counts as a cycle.
///
/// Edges touching an unlisted id are still followed: `a -> ghost` plus the
/// candidate `ghost -> a` is a cycle, and so is `ghost -> ghost`. A checker
/// that silently drops edges whose source is unlisted would answer `false`
/// for both; list every endpoint in `nodes` if the two must agree.
///
/// Runs in O(V + E) with an explicit stack, so deep chains are safe.
///
/// # Examples
///
/// ```
/// use flowdag::cycles::would_create_cycle;
/// use flowdag::graph::Edge;
///
/// let nodes = ["a", "b", "c"];
/// let cyclic = [Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")];
/// assert!(would_create_cycle(&nodes, &cyclic, None));
///
/// let no_edges: [Edge<&str>; 0] = [];
/// assert!(would_create_cycle(&["a"], &no_edges, Some(&Edge::new("a", "a"))));
/// ```
pub fn would_create_cycle<'a, Id, N, E>(nodes: N, edges: E, candidate: Option<&'a Edge<Id>>) -> bool
where
    Id: Eq + Hash + 'a,
    N: IntoIterator<Item = &'a Id>,
    E: IntoIterator<Item = &'a Edge<Id>>,
{
    Adjacency::build(nodes, edges, candidate)
        .find_back_edge()
        .is_some()
}

/// Find one directed cycle in the graph plus `candidate`.
///
/// The returned path starts at the node the back-edge points to and follows
/// successors until the node the back-edge leaves from. A self-loop yields a
/// single-element path.
///
/// # Examples
///
/// ```
/// use flowdag::cycles::find_cycle;
/// use flowdag::graph::Edge;
///
/// let nodes = ["a", "b", "c"];
/// let edges = [Edge::new("a", "b"), Edge::new("b", "c")];
///
/// let cycle = find_cycle(&nodes, &edges, Some(&Edge::new("c", "a"))).unwrap();
/// assert_eq!(cycle, vec!["a", "b", "c"]);
/// ```
pub fn find_cycle<'a, Id, N, E>(nodes: N, edges: E, candidate: Option<&'a Edge<Id>>) -> Option<Vec<Id>>
where
    Id: Eq + Hash + Clone + 'a,
    N: IntoIterator<Item = &'a Id>,
    E: IntoIterator<Item = &'a Edge<Id>>,
{
    let adjacency = Adjacency::build(nodes, edges, candidate);
    let path = adjacency.find_back_edge()?;
    Some(path.into_iter().map(|idx| adjacency.ids[idx].clone()).collect())
}

/// Per-node traversal state, local to one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Finished,
}

/// Successor lists over interned node indices.
///
/// Ids are interned in first-seen order: `nodes` first, then edge endpoints
/// that `nodes` did not mention.
pub(crate) struct Adjacency<'a, Id> {
    ids: Vec<&'a Id>,
    id_to_index: HashMap<&'a Id, usize>,
    successors: Vec<Vec<usize>>,
}

impl<'a, Id: Eq + Hash> Adjacency<'a, Id> {
    pub(crate) fn build<N, E>(nodes: N, edges: E, candidate: Option<&'a Edge<Id>>) -> Self
    where
        N: IntoIterator<Item = &'a Id>,
        E: IntoIterator<Item = &'a Edge<Id>>,
    {
        let mut adjacency = Self {
            ids: Vec::new(),
            id_to_index: HashMap::new(),
            successors: Vec::new(),
        };
        for id in nodes {
            adjacency.intern(id);
        }
        for edge in edges.into_iter().chain(candidate) {
            let from = adjacency.intern(&edge.source);
            let to = adjacency.intern(&edge.target);
            adjacency.successors[from].push(to);
        }
        adjacency
    }

    fn intern(&mut self, id: &'a Id) -> usize {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.id_to_index.insert(id, idx);
        self.successors.push(Vec::new());
        idx
    }

    /// Depth-first search from every unvisited node.
    ///
    /// Returns the traversal path closed by the first back-edge found, as
    /// indices from the back-edge target to its source.
    pub(crate) fn find_back_edge(&self) -> Option<Vec<usize>> {
        let mut marks = vec![Mark::Unvisited; self.ids.len()];
        // (node, index of next successor to explore)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.ids.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::InProgress;
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                let Some(&child) = self.successors[node].get(next) else {
                    marks[node] = Mark::Finished;
                    stack.pop();
                    continue;
                };
                top.1 += 1;

                match marks[child] {
                    Mark::InProgress => {
                        let start = stack.iter().position(|&(idx, _)| idx == child)?;
                        return Some(stack[start..].iter().map(|&(idx, _)| idx).collect());
                    }
                    Mark::Unvisited => {
                        marks[child] = Mark::InProgress;
                        stack.push((child, 0));
                    }
                    Mark::Finished => {}
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&'static str, &'static str)]) -> Vec<Edge<&'static str>> {
        pairs.iter().map(|&(s, t)| Edge::new(s, t)).collect()
    }

    #[test]
    fn test_self_loop_candidate() {
        let candidate = Edge::new("a", "a");
        assert!(would_create_cycle(&["a"], &edges(&[]), Some(&candidate)));
    }

    #[test]
    fn test_simple_chain() {
        let nodes = ["a", "b", "c"];
        let chain = edges(&[("a", "b"), ("b", "c")]);

        assert!(would_create_cycle(&nodes, &chain, Some(&Edge::new("c", "a"))));
        assert!(!would_create_cycle(&nodes, &chain, Some(&Edge::new("a", "c"))));
    }

    #[test]
    fn test_disconnected_components() {
        let nodes = ["a", "b", "c", "d"];
        let committed = edges(&[("a", "b")]);
        assert!(!would_create_cycle(&nodes, &committed, Some(&Edge::new("c", "d"))));
    }

    #[test]
    fn test_no_candidate_mode() {
        let nodes = ["a", "b", "c"];
        let cyclic = edges(&[("a", "b"), ("b", "c"), ("c", "a")]);
        assert!(would_create_cycle(&nodes, &cyclic, None));

        let acyclic = edges(&[("a", "b"), ("b", "c")]);
        assert!(!would_create_cycle(&nodes, &acyclic, None));
    }

    #[test]
    fn test_duplicate_edges() {
        let nodes = ["a", "b"];
        let candidate = Edge::new("b", "a");

        let single = edges(&[("a", "b")]);
        let doubled = edges(&[("a", "b"), ("a", "b")]);
        assert!(would_create_cycle(&nodes, &single, Some(&candidate)));
        assert!(would_create_cycle(&nodes, &doubled, Some(&candidate)));
    }

    #[test]
    fn test_diamond() {
        let nodes = ["top", "left", "right", "bottom"];
        let diamond = edges(&[
            ("top", "left"),
            ("top", "right"),
            ("left", "bottom"),
            ("right", "bottom"),
        ]);

        assert!(!would_create_cycle(&nodes, &diamond, None));
        assert!(!would_create_cycle(&nodes, &diamond, Some(&Edge::new("left", "right"))));
        assert!(would_create_cycle(&nodes, &diamond, Some(&Edge::new("bottom", "top"))));
    }

    #[test]
    fn test_unknown_endpoints_no_panic() {
        let nodes = ["a"];
        let committed = edges(&[("a", "ghost")]);

        assert!(!would_create_cycle(&nodes, &committed, None));
        assert!(!would_create_cycle(&nodes, &committed, Some(&Edge::new("x", "y"))));
        assert!(would_create_cycle(&nodes, &committed, Some(&Edge::new("ghost", "a"))));
    }

    #[test]
    fn test_unknown_self_loop_is_cycle() {
        let nodes = ["a"];
        let ghost_loop = Edge::new("ghost", "ghost");

        assert!(would_create_cycle(&nodes, &edges(&[]), Some(&ghost_loop)));
        assert!(would_create_cycle(&nodes, &edges(&[("ghost", "ghost")]), None));
        assert_eq!(
            find_cycle(&nodes, &edges(&[]), Some(&ghost_loop)),
            Some(vec!["ghost"])
        );
    }

    #[test]
    fn test_empty_graph() {
        let nodes: [&str; 0] = [];
        assert!(!would_create_cycle(&nodes, &edges(&[]), None));
    }

    #[test]
    fn test_node_set_input() {
        use std::collections::HashSet;

        let nodes: HashSet<&str> = ["a", "b", "c"].into_iter().collect();
        let chain = edges(&[("a", "b"), ("b", "c")]);
        assert!(would_create_cycle(&nodes, &chain, Some(&Edge::new("c", "a"))));
    }

    #[test]
    fn test_input_untouched() {
        let nodes = vec!["a", "b"];
        let committed = edges(&[("a", "b")]);
        let candidate = Edge::new("b", "a");

        let first = would_create_cycle(&nodes, &committed, Some(&candidate));
        let second = would_create_cycle(&nodes, &committed, Some(&candidate));
        assert_eq!(first, second);
        assert_eq!(committed, edges(&[("a", "b")]));
    }

    #[test]
    fn test_find_cycle_path() {
        let nodes = ["a", "b", "c", "d"];
        let committed = edges(&[("a", "b"), ("b", "c"), ("c", "d")]);

        let cycle = find_cycle(&nodes, &committed, Some(&Edge::new("d", "b"))).unwrap();
        assert_eq!(cycle, vec!["b", "c", "d"]);

        assert_eq!(find_cycle(&nodes, &committed, None), None);
    }

    #[test]
    fn test_find_cycle_self_loop() {
        let cycle = find_cycle(&["a"], &edges(&[]), Some(&Edge::new("a", "a"))).unwrap();
        assert_eq!(cycle, vec!["a"]);
    }

    #[test]
    fn test_deep_chain_no_stack_overflow() {
        let ids: Vec<String> = (0..100_000).map(|i| format!("n{i}")).collect();
        let chain: Vec<Edge<String>> = ids
            .windows(2)
            .map(|pair| Edge::new(pair[0].clone(), pair[1].clone()))
            .collect();

        let closing = Edge::new(ids[ids.len() - 1].clone(), ids[0].clone());
        assert!(would_create_cycle(&ids, &chain, Some(&closing)));

        let shortcut = Edge::new(ids[0].clone(), ids[ids.len() - 1].clone());
        assert!(!would_create_cycle(&ids, &chain, Some(&shortcut)));
    }

    #[test]
    fn test_integer_ids() {
        let nodes = [1usize, 2, 3];
        let committed = vec![Edge::new(1usize, 2usize), Edge::new(2usize, 3usize)];
        assert!(would_create_cycle(&nodes, &committed, Some(&Edge::new(3usize, 1usize))));
    }
}
