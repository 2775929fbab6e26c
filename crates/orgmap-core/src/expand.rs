//! Neighbor expansion: local BFS over the loaded edge set.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::Edge;

/// Compute the ego network around `start`: every node reachable within
/// `max_hops` edges, treating edges as undirected.
///
/// Operates purely on the in-memory edge set; no backing store is touched.
/// A visited set guarantees termination on cyclic graphs, and each node is
/// recorded at the hop count it is first dequeued. `max_hops = 0` yields
/// exactly `{start}`.
pub fn ego_network(edges: &[Edge], start: &str, max_hops: u32) -> HashSet<String> {
    let mut reachable: HashSet<String> = HashSet::new();
    reachable.insert(start.to_string());
    if max_hops == 0 {
        return reachable;
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        adjacency.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
        adjacency.entry(edge.target.as_str()).or_default().push(edge.source.as_str());
    }

    let mut queue: VecDeque<(&str, u32)> = VecDeque::new();
    queue.push_back((start, 0));
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start);

    while let Some((node, hops)) = queue.pop_front() {
        reachable.insert(node.to_string());
        if hops == max_hops {
            continue;
        }
        if let Some(neighbors) = adjacency.get(node) {
            for &next in neighbors {
                if visited.insert(next) {
                    queue.push_back((next, hops + 1));
                }
            }
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rel;

    fn chain() -> Vec<Edge> {
        // a -> b -> c -> d, plus a cycle d -> a
        vec![
            Edge::new("a", rel::OWNS, "b"),
            Edge::new("b", rel::HAS_ROLE, "c"),
            Edge::new("c", rel::PERFORMS, "d"),
            Edge::new("d", rel::OWNS, "a"),
        ]
    }

    #[test]
    fn zero_hops_returns_only_the_start() {
        let reachable = ego_network(&chain(), "a", 0);
        assert_eq!(reachable.len(), 1);
        assert!(reachable.contains("a"));
    }

    #[test]
    fn hop_counts_grow_monotonically() {
        let edges = chain();
        let mut previous: HashSet<String> = HashSet::new();
        for hops in 0..5 {
            let current = ego_network(&edges, "a", hops);
            assert!(previous.is_subset(&current), "hops={} removed nodes", hops);
            previous = current;
        }
    }

    #[test]
    fn traversal_is_undirected() {
        // "d" can reach "c" against the edge direction.
        let reachable = ego_network(&chain(), "d", 1);
        assert!(reachable.contains("c"));
        assert!(reachable.contains("a"));
    }

    #[test]
    fn cycles_terminate_without_duplicates() {
        let reachable = ego_network(&chain(), "a", 10);
        assert_eq!(reachable.len(), 4);
    }

    #[test]
    fn unknown_start_yields_itself() {
        let reachable = ego_network(&chain(), "ghost", 3);
        assert_eq!(reachable.len(), 1);
        assert!(reachable.contains("ghost"));
    }
}
