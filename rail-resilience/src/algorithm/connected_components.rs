use std::collections::BTreeSet;

use crate::{
    algorithm::bfs_undirected,
    model::{network::UndirectedGraph, station::StationId, ResilienceError},
};

/// all connected components of the graph, largest first. components of equal size
/// are ordered by their smallest station id.
pub fn connected_components<E>(
    graph: &UndirectedGraph<E>,
) -> Result<Vec<BTreeSet<StationId>>, ResilienceError> {
    let mut assigned: BTreeSet<StationId> = BTreeSet::new();
    let mut components: Vec<BTreeSet<StationId>> = vec![];
    for station_id in graph.nodes() {
        if assigned.contains(&station_id) {
            continue;
        }
        let component = bfs_undirected(station_id, graph, None)?;
        assigned.extend(component.iter().copied());
        components.push(component);
    }
    // stable sort keeps discovery (smallest id) order among ties
    components.sort_by(|a, b| b.len().cmp(&a.len()));
    Ok(components)
}

/// the largest connected component, or an empty set for an empty graph
pub fn largest_component<E>(
    graph: &UndirectedGraph<E>,
) -> Result<BTreeSet<StationId>, ResilienceError> {
    let mut components = connected_components(graph)?;
    if components.is_empty() {
        Ok(BTreeSet::new())
    } else {
        Ok(components.swap_remove(0))
    }
}

/// true if the graph has at least one node and a single component
pub fn is_connected<E>(graph: &UndirectedGraph<E>) -> Result<bool, ResilienceError> {
    match graph.nodes().next() {
        None => Ok(false),
        Some(first) => Ok(bfs_undirected(first, graph, None)?.len() == graph.n_nodes()),
    }
}

/// number of unordered station pairs that can still reach each other
pub fn reachable_pairs<E>(graph: &UndirectedGraph<E>) -> Result<usize, ResilienceError> {
    let pairs = connected_components(graph)?
        .iter()
        .map(|c| c.len() * c.len().saturating_sub(1) / 2)
        .sum();
    Ok(pairs)
}
