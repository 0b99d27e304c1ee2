use std::collections::{BTreeMap, VecDeque};

use itertools::Itertools;
use rayon::prelude::*;

use crate::model::{network::UndirectedGraph, station::StationId};

/// normalized shortest-path betweenness centrality of every node, counting hops
/// (edge weights are ignored). values are scaled by 1 / ((n-1)(n-2)) so that a
/// node on every shortest path between all other pairs scores 1.
///
/// runs Brandes' accumulation once per source node, optionally on the rayon pool.
pub fn betweenness_centrality<E>(
    graph: &UndirectedGraph<E>,
    parallelize: bool,
) -> BTreeMap<StationId, f64> {
    let nodes = graph.nodes().collect_vec();
    let index: BTreeMap<StationId, usize> =
        nodes.iter().enumerate().map(|(i, s)| (*s, i)).collect();
    let neighbors: Vec<Vec<usize>> = nodes
        .iter()
        .map(|s| graph.neighbors(s).filter_map(|n| index.get(&n).copied()).collect())
        .collect();

    let totals = if parallelize {
        (0..nodes.len())
            .into_par_iter()
            .map(|src| single_source_dependency(src, &neighbors))
            .reduce(|| vec![0.0; nodes.len()], add_dependencies)
    } else {
        (0..nodes.len())
            .map(|src| single_source_dependency(src, &neighbors))
            .fold(vec![0.0; nodes.len()], add_dependencies)
    };

    let n = nodes.len() as f64;
    let scale = if nodes.len() > 2 {
        1.0 / ((n - 1.0) * (n - 2.0))
    } else {
        1.0
    };
    nodes
        .into_iter()
        .zip(totals)
        .map(|(s, total)| (s, total * scale))
        .collect()
}

fn add_dependencies(mut acc: Vec<f64>, other: Vec<f64>) -> Vec<f64> {
    for (a, b) in acc.iter_mut().zip(other) {
        *a += b;
    }
    acc
}

/// dependency of `src` on every other node, from one breadth-first search
fn single_source_dependency(src: usize, neighbors: &[Vec<usize>]) -> Vec<f64> {
    let n = neighbors.len();
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![vec![]; n];
    let mut sigma: Vec<f64> = vec![0.0; n];
    let mut depth: Vec<Option<usize>> = vec![None; n];
    sigma[src] = 1.0;
    depth[src] = Some(0);

    let mut frontier: VecDeque<usize> = VecDeque::from([src]);
    while let Some(v) = frontier.pop_front() {
        order.push(v);
        let next_depth = depth[v].map(|d| d + 1);
        for &w in neighbors[v].iter() {
            if depth[w].is_none() {
                depth[w] = next_depth;
                frontier.push_back(w);
            }
            if depth[w] == next_depth {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    let mut delta: Vec<f64> = vec![0.0; n];
    for &w in order.iter().rev() {
        for &v in predecessors[w].iter() {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
    }
    delta[src] = 0.0;
    delta
}
