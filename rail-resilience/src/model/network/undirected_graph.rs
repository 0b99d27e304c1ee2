use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{station::StationId, ResilienceError};

/// key of an undirected edge, stored with the smaller station id first so that
/// (a, b) and (b, a) address the same edge.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey(StationId, StationId);

impl EdgeKey {
    pub fn new(a: StationId, b: StationId) -> EdgeKey {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    pub fn src(&self) -> StationId {
        self.0
    }

    pub fn dst(&self) -> StationId {
        self.1
    }

    pub fn contains(&self, station_id: &StationId) -> bool {
        self.0 == *station_id || self.1 == *station_id
    }
}

/// simple undirected graph over station ids with one payload per edge.
///
/// both the stop-level graph and the D&K graph are instances of this type. nodes and
/// neighbors are kept in ordered collections so every traversal visits stations in id
/// order, which keeps rankings and tie-breaks reproducible. cloning is a structural
/// copy, which is what failure scenarios rely on.
#[derive(Debug, Clone)]
pub struct UndirectedGraph<E> {
    adjacency: BTreeMap<StationId, BTreeSet<StationId>>,
    edges: BTreeMap<EdgeKey, E>,
}

impl<E> Default for UndirectedGraph<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> UndirectedGraph<E> {
    pub fn empty() -> UndirectedGraph<E> {
        UndirectedGraph {
            adjacency: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// adds a node with no incident edges. no effect if the node exists.
    pub fn add_node(&mut self, station_id: StationId) {
        self.adjacency.entry(station_id).or_default();
    }

    pub fn contains_node(&self, station_id: &StationId) -> bool {
        self.adjacency.contains_key(station_id)
    }

    pub fn n_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// nodes in ascending id order
    pub fn nodes(&self) -> impl Iterator<Item = StationId> + '_ {
        self.adjacency.keys().copied()
    }

    /// neighbors in ascending id order, empty if the node is not in the graph
    pub fn neighbors(&self, station_id: &StationId) -> impl Iterator<Item = StationId> + '_ {
        self.adjacency
            .get(station_id)
            .into_iter()
            .flat_map(|n| n.iter().copied())
    }

    pub fn degree(&self, station_id: &StationId) -> usize {
        self.adjacency.get(station_id).map(|n| n.len()).unwrap_or(0)
    }

    pub fn edge(&self, a: &StationId, b: &StationId) -> Option<&E> {
        self.edges.get(&EdgeKey::new(*a, *b))
    }

    pub fn edge_mut(&mut self, a: &StationId, b: &StationId) -> Option<&mut E> {
        self.edges.get_mut(&EdgeKey::new(*a, *b))
    }

    pub fn contains_edge(&self, a: &StationId, b: &StationId) -> bool {
        self.edges.contains_key(&EdgeKey::new(*a, *b))
    }

    /// edges in ascending key order
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &E)> + '_ {
        self.edges.iter()
    }

    /// returns the payload of the edge between a and b, creating it with `init` if it
    /// does not exist yet. both nodes must already be in the graph.
    pub fn upsert_edge<F>(
        &mut self,
        a: StationId,
        b: StationId,
        init: F,
    ) -> Result<&mut E, ResilienceError>
    where
        F: FnOnce() -> E,
    {
        if a == b {
            return Err(ResilienceError::SelfLoop(a));
        }
        if !self.contains_node(&a) {
            return Err(ResilienceError::GraphMissingStation(a));
        }
        if !self.contains_node(&b) {
            return Err(ResilienceError::GraphMissingStation(b));
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        Ok(self.edges.entry(EdgeKey::new(a, b)).or_insert_with(init))
    }

    /// converts every edge payload, keeping the structure unchanged
    pub fn map_edges<F, T>(self, mut op: F) -> UndirectedGraph<T>
    where
        F: FnMut(&EdgeKey, E) -> T,
    {
        let edges = self
            .edges
            .into_iter()
            .map(|(k, e)| {
                let mapped = op(&k, e);
                (k, mapped)
            })
            .collect();
        UndirectedGraph {
            adjacency: self.adjacency,
            edges,
        }
    }

    /// the subgraph induced by every node not in `removed`. this graph is untouched.
    pub fn without_nodes(&self, removed: &BTreeSet<StationId>) -> UndirectedGraph<E>
    where
        E: Clone,
    {
        let adjacency = self
            .adjacency
            .iter()
            .filter(|(id, _)| !removed.contains(id))
            .map(|(id, neighbors)| {
                let kept = neighbors
                    .iter()
                    .filter(|n| !removed.contains(n))
                    .copied()
                    .collect::<BTreeSet<_>>();
                (*id, kept)
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|(k, _)| !removed.contains(&k.src()) && !removed.contains(&k.dst()))
            .map(|(k, e)| (*k, e.clone()))
            .collect();
        UndirectedGraph { adjacency, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: usize) -> UndirectedGraph<u32> {
        let mut g = UndirectedGraph::empty();
        for i in 0..n {
            g.add_node(StationId(i));
        }
        for i in 1..n {
            let e = g
                .upsert_edge(StationId(i - 1), StationId(i), || 0)
                .expect("nodes exist");
            *e += 1;
        }
        g
    }

    #[test]
    fn test_edge_key_is_unordered() {
        assert_eq!(
            EdgeKey::new(StationId(3), StationId(1)),
            EdgeKey::new(StationId(1), StationId(3))
        );
        let k = EdgeKey::new(StationId(3), StationId(1));
        assert_eq!(k.src(), StationId(1));
        assert_eq!(k.dst(), StationId(3));
    }

    #[test]
    fn test_upsert_reuses_existing_edge() {
        let mut g = path_graph(3);
        let e = g
            .upsert_edge(StationId(1), StationId(0), || 100)
            .expect("nodes exist");
        *e += 1;
        assert_eq!(g.edge(&StationId(0), &StationId(1)), Some(&2));
        assert_eq!(g.n_edges(), 2);
        assert_eq!(g.degree(&StationId(1)), 2);
    }

    #[test]
    fn test_upsert_rejects_self_loop_and_missing_nodes() {
        let mut g = path_graph(2);
        assert!(matches!(
            g.upsert_edge(StationId(0), StationId(0), || 0),
            Err(ResilienceError::SelfLoop(_))
        ));
        assert!(matches!(
            g.upsert_edge(StationId(0), StationId(9), || 0),
            Err(ResilienceError::GraphMissingStation(StationId(9)))
        ));
    }

    #[test]
    fn test_without_nodes_leaves_original_intact() {
        let g = path_graph(4);
        let removed = BTreeSet::from([StationId(1)]);
        let sub = g.without_nodes(&removed);
        assert_eq!(sub.n_nodes(), 3);
        assert_eq!(sub.n_edges(), 1);
        assert_eq!(sub.degree(&StationId(0)), 0);
        assert!(sub.contains_edge(&StationId(2), &StationId(3)));
        assert_eq!(g.n_nodes(), 4);
        assert_eq!(g.n_edges(), 3);
    }
}
