//! Cycle checks for graphs held in caller-owned structures.
//!
//! The interaction layer rarely stores its graph as a [`Snapshot`]. This
//! module adapts whatever it does store, either through closures returning
//! successors or by implementing [`GraphSource`].

use std::hash::Hash;

use super::Adjacency;
use crate::graph::{Edge, Snapshot};

/// A live graph that can enumerate its nodes and edges on demand.
///
/// Implement this for the object model of your rendering layer to get cycle
/// checks for free. Every check captures a fresh [`Snapshot`].
///
/// # Examples
///
/// ```
/// use flowdag::cycles::generic::GraphSource;
/// use flowdag::graph::Edge;
///
/// struct Canvas {
///     blocks: Vec<&'static str>,
///     links: Vec<(&'static str, &'static str)>,
/// }
///
/// impl GraphSource for Canvas {
///     type Id = &'static str;
///
///     fn node_ids(&self) -> Vec<Self::Id> {
///         self.blocks.clone()
///     }
///
///     fn edge_list(&self) -> Vec<Edge<Self::Id>> {
///         self.links.iter().copied().map(Edge::from).collect()
///     }
/// }
///
/// let canvas = Canvas {
///     blocks: vec!["load", "clean", "train"],
///     links: vec![("load", "clean"), ("clean", "train")],
/// };
///
/// assert!(!canvas.has_cycle());
/// assert!(canvas.would_create_cycle(&Edge::new("train", "load")));
/// ```
pub trait GraphSource {
    /// Identifier type used by the live graph.
    type Id: Eq + Hash + Clone;

    /// Every node currently present.
    fn node_ids(&self) -> Vec<Self::Id>;

    /// Every committed edge, in any order.
    fn edge_list(&self) -> Vec<Edge<Self::Id>>;

    /// Capture the current state.
    fn snapshot(&self) -> Snapshot<Self::Id> {
        Snapshot::from_parts(self.node_ids(), self.edge_list())
    }

    /// Does the committed graph already contain a cycle?
    fn has_cycle(&self) -> bool {
        self.snapshot().has_cycle()
    }

    /// Would committing `candidate` create a cycle?
    fn would_create_cycle(&self, candidate: &Edge<Self::Id>) -> bool {
        self.snapshot().would_create_cycle(Some(candidate))
    }
}

/// Find a cycle in a graph described by ids and a successor function.
///
/// Successors missing from `all_ids` are still followed.
///
/// # Examples
///
/// ```
/// use flowdag::cycles::generic::detect_cycle_fn;
///
/// let next = |step: &&str| -> Vec<&str> {
///     match *step {
///         "fetch" => vec!["parse"],
///         "parse" => vec!["store"],
///         "store" => vec!["fetch"], // loops back
///         _ => vec![],
///     }
/// };
///
/// let cycle = detect_cycle_fn(&["fetch", "parse", "store"], next).unwrap();
/// assert_eq!(cycle, vec!["fetch", "parse", "store"]);
/// ```
pub fn detect_cycle_fn<Id, F>(all_ids: &[Id], get_successors: F) -> Option<Vec<Id>>
where
    Id: Eq + Hash + Clone,
    F: Fn(&Id) -> Vec<Id>,
{
    let edges = collect_edges(all_ids, &get_successors);
    super::find_cycle(all_ids, &edges, None)
}

/// Just check if a cycle exists.
pub fn has_cycle_fn<Id, F>(all_ids: &[Id], get_successors: F) -> bool
where
    Id: Eq + Hash + Clone,
    F: Fn(&Id) -> Vec<Id>,
{
    let edges = collect_edges(all_ids, &get_successors);
    Adjacency::build(all_ids, &edges, None).find_back_edge().is_some()
}

/// Would adding `source -> target` to the described graph create a cycle?
///
/// # Examples
///
/// ```
/// use flowdag::cycles::generic::would_create_cycle_fn;
///
/// let next = |id: &u32| -> Vec<u32> {
///     match id {
///         1 => vec![2],
///         2 => vec![3],
///         _ => vec![],
///     }
/// };
///
/// assert!(would_create_cycle_fn(&[1, 2, 3], next, 3, 1));
/// assert!(!would_create_cycle_fn(&[1, 2, 3], next, 1, 3));
/// ```
pub fn would_create_cycle_fn<Id, F>(all_ids: &[Id], get_successors: F, source: Id, target: Id) -> bool
where
    Id: Eq + Hash + Clone,
    F: Fn(&Id) -> Vec<Id>,
{
    let edges = collect_edges(all_ids, &get_successors);
    let candidate = Edge { source, target };
    super::would_create_cycle(all_ids, &edges, Some(&candidate))
}

/// Expand the successor function over `all_ids` and anything reachable.
fn collect_edges<Id, F>(all_ids: &[Id], get_successors: &F) -> Vec<Edge<Id>>
where
    Id: Eq + Hash + Clone,
    F: Fn(&Id) -> Vec<Id>,
{
    let mut seen: std::collections::HashSet<Id> = all_ids.iter().cloned().collect();
    let mut pending: Vec<Id> = all_ids.to_vec();
    let mut edges = Vec::new();

    // Reversed so ids pop in the order given.
    pending.reverse();
    while let Some(id) = pending.pop() {
        for next in get_successors(&id) {
            if seen.insert(next.clone()) {
                pending.push(next.clone());
            }
            edges.push(Edge {
                source: id.clone(),
                target: next,
            });
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_cycle_detection_with_closure() {
        let get_next = |id: &usize| -> Vec<usize> {
            match id {
                1 => vec![2],
                2 => vec![3],
                3 => vec![1],
                _ => vec![],
            }
        };

        let all_ids = vec![1, 2, 3];
        assert!(has_cycle_fn(&all_ids, get_next));
        let cycle = detect_cycle_fn(&all_ids, get_next).unwrap();
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn test_no_cycle_with_closure() {
        let get_next = |id: &usize| -> Vec<usize> {
            match id {
                1 => vec![2, 3],
                2 => vec![4],
                3 => vec![4],
                _ => vec![],
            }
        };

        let all_ids = vec![1, 2, 3, 4];
        assert!(!has_cycle_fn(&all_ids, get_next));
        assert!(detect_cycle_fn(&all_ids, get_next).is_none());
    }

    #[test]
    fn test_successor_outside_id_list_followed() {
        // 2 is never listed but closes the loop.
        let get_next = |id: &usize| -> Vec<usize> {
            match id {
                1 => vec![2],
                2 => vec![1],
                _ => vec![],
            }
        };

        assert!(has_cycle_fn(&[1], get_next));
    }

    #[test]
    fn test_self_referential_candidate() {
        let get_next = |_: &usize| -> Vec<usize> { vec![] };
        assert!(would_create_cycle_fn(&[1], get_next, 1, 1));
    }

    struct Board {
        cards: Vec<String>,
        arrows: HashMap<String, Vec<String>>,
    }

    impl GraphSource for Board {
        type Id = String;

        fn node_ids(&self) -> Vec<String> {
            self.cards.clone()
        }

        fn edge_list(&self) -> Vec<Edge<String>> {
            let mut edges = Vec::new();
            for card in &self.cards {
                for target in self.arrows.get(card).into_iter().flatten() {
                    edges.push(Edge::new(card.clone(), target.clone()));
                }
            }
            edges
        }
    }

    #[test]
    fn test_trait_based_check() {
        let mut arrows = HashMap::new();
        arrows.insert("a".to_string(), vec!["b".to_string()]);
        arrows.insert("b".to_string(), vec!["c".to_string()]);

        let board = Board {
            cards: vec!["a".into(), "b".into(), "c".into()],
            arrows,
        };

        let snapshot = board.snapshot();
        assert_eq!(snapshot.node_count(), 3);
        assert_eq!(snapshot.edge_count(), 2);

        assert!(!board.has_cycle());
        assert!(board.would_create_cycle(&Edge::new("c".to_string(), "a".to_string())));
        assert!(!board.would_create_cycle(&Edge::new("a".to_string(), "c".to_string())));
    }
}
