use std::collections::{BTreeSet, VecDeque};

use crate::model::{network::UndirectedGraph, station::StationId, ResilienceError};

/// finds the set of stations connected to `src` using a breadth-first search over
/// an undirected graph.
///
/// # Arguments
///
/// * `src` - origin of the search
/// * `graph` - graph to search
/// * `valid_set` - set of valid stations to visit, or None if all are acceptable.
///
/// # Returns
///
/// The set of station ids reachable from `src` within the valid set, including `src`.
pub fn bfs_undirected<E>(
    src: StationId,
    graph: &UndirectedGraph<E>,
    valid_set: Option<&BTreeSet<StationId>>,
) -> Result<BTreeSet<StationId>, ResilienceError> {
    if !graph.contains_node(&src) {
        return Err(ResilienceError::GraphMissingStation(src));
    }
    let mut visited: BTreeSet<StationId> = BTreeSet::from([src]);
    let mut frontier: VecDeque<StationId> = VecDeque::from([src]);

    while let Some(next_id) = frontier.pop_front() {
        // neighbors come back in id order, keeping frontier insertion deterministic
        let valid_neighbors = graph.neighbors(&next_id).filter(|n| match &valid_set {
            Some(valid) => valid.contains(n),
            None => true,
        });
        for neighbor in valid_neighbors {
            if visited.insert(neighbor) {
                frontier.push_back(neighbor);
            }
        }
    }

    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> UndirectedGraph<()> {
        let mut g = UndirectedGraph::empty();
        for i in 0..n {
            g.add_node(StationId(i));
        }
        for (a, b) in edges {
            g.upsert_edge(StationId(*a), StationId(*b), || ())
                .expect("test edge");
        }
        g
    }

    #[test]
    fn test_bfs_stays_in_component() {
        let g = graph(5, &[(0, 1), (1, 2), (3, 4)]);
        let found = bfs_undirected(StationId(2), &g, None).expect("src exists");
        assert_eq!(found, BTreeSet::from([StationId(0), StationId(1), StationId(2)]));
    }

    #[test]
    fn test_bfs_respects_valid_set() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let valid = BTreeSet::from([StationId(0), StationId(1), StationId(3)]);
        let found = bfs_undirected(StationId(0), &g, Some(&valid)).expect("src exists");
        assert_eq!(found, BTreeSet::from([StationId(0), StationId(1)]));
    }

    #[test]
    fn test_bfs_missing_source() {
        let g = graph(1, &[]);
        assert!(bfs_undirected(StationId(7), &g, None).is_err());
    }
}
