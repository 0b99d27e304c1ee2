use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::algorithm::connected_components;
use crate::model::{
    network::{LineId, SpecialGraph},
    station::StationId,
    ResilienceError,
};

/// search state: a station and the line currently boarded there
type BoardedState = (StationId, LineId);

/// minimum number of line changes from `src` to every station it can reach.
///
/// the search runs over (station, boarded line) states. it starts from one state per
/// line serving `src`, at zero changes. riding an edge on the boarded line is free and
/// switching to another line on the edge costs one change, so a 0-1 breadth-first
/// search (free moves to the front of the queue) settles each state at its minimum.
///
/// # Arguments
///
/// * `src` - origin station, must be in the graph
/// * `graph` - D&K graph whose edges carry the lines that run on them
/// * `station_lines` - lines serving each station, used to seed the search
/// * `valid_set` - stations the search may enter, or None if all are acceptable
///
/// # Returns
///
/// The change count for each reachable station. `src` itself maps to 0.
pub fn line_changes_from(
    src: StationId,
    graph: &SpecialGraph,
    station_lines: &BTreeMap<StationId, BTreeSet<LineId>>,
    valid_set: Option<&BTreeSet<StationId>>,
) -> Result<BTreeMap<StationId, usize>, ResilienceError> {
    if !graph.contains_node(&src) {
        return Err(ResilienceError::GraphMissingStation(src));
    }
    let mut best: HashMap<BoardedState, usize> = HashMap::new();
    let mut frontier: VecDeque<(BoardedState, usize)> = VecDeque::new();
    for line in station_lines.get(&src).into_iter().flatten() {
        best.insert((src, *line), 0);
        frontier.push_back(((src, *line), 0));
    }

    while let Some(((station, line), changes)) = frontier.pop_front() {
        if best.get(&(station, line)).is_some_and(|b| *b < changes) {
            continue; // stale entry
        }
        let neighbors = graph.neighbors(&station).filter(|n| match &valid_set {
            Some(valid) => valid.contains(n),
            None => true,
        });
        for neighbor in neighbors {
            let edge = graph
                .edge(&station, &neighbor)
                .ok_or_else(|| {
                    ResilienceError::InternalError(format!(
                        "adjacency lists {station} -> {neighbor} but no edge exists"
                    ))
                })?;
            for edge_line in edge.lines.iter() {
                let cost = if *edge_line == line {
                    changes
                } else {
                    changes + 1
                };
                let state = (neighbor, *edge_line);
                if best.get(&state).map_or(true, |b| cost < *b) {
                    best.insert(state, cost);
                    if cost == changes {
                        frontier.push_front((state, cost));
                    } else {
                        frontier.push_back((state, cost));
                    }
                }
            }
        }
    }

    let mut result: BTreeMap<StationId, usize> = BTreeMap::from([(src, 0)]);
    for ((station, _), changes) in best.into_iter() {
        let entry = result.entry(station).or_insert(changes);
        *entry = (*entry).min(changes);
    }
    Ok(result)
}

/// minimum number of line changes between two stations, or None if `dst` cannot be
/// reached from `src`.
pub fn min_line_changes(
    src: StationId,
    dst: StationId,
    graph: &SpecialGraph,
    station_lines: &BTreeMap<StationId, BTreeSet<LineId>>,
) -> Result<Option<usize>, ResilienceError> {
    if !graph.contains_node(&dst) {
        return Err(ResilienceError::GraphMissingStation(dst));
    }
    let changes = line_changes_from(src, graph, station_lines, None)?;
    Ok(changes.get(&dst).copied())
}

/// the largest minimum line-change count between any two special vertices (δ).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChangeDiameter {
    pub delta: usize,
    /// true when the graph was disconnected and only its largest component was used
    pub approximate: bool,
    /// special vertices included in the pairwise evaluation
    pub evaluated_vertices: usize,
    /// pairs with no line-aware route, each counted at the sentinel value `n_lines`
    pub sentinel_pairs: usize,
}

/// computes δ over every pair of `special` vertices in the graph.
///
/// a disconnected graph is restricted to its largest component and the result is
/// flagged approximate. a pair inside the evaluated component that has no
/// line-aware route counts as `n_lines` changes and is tallied in `sentinel_pairs`;
/// such a value is a marker for effective disconnection, not a real change count.
pub fn line_change_diameter(
    graph: &SpecialGraph,
    special: &BTreeSet<StationId>,
    station_lines: &BTreeMap<StationId, BTreeSet<LineId>>,
    n_lines: usize,
) -> Result<LineChangeDiameter, ResilienceError> {
    if graph.is_empty() {
        return Ok(LineChangeDiameter::default());
    }
    let connected = connected_components::is_connected(graph)?;
    let scope: BTreeSet<StationId> = if connected {
        graph.nodes().collect()
    } else {
        let components = connected_components::connected_components(graph)?;
        log::warn!(
            "D&K graph has {} components (sizes {:?}); computing δ on the largest only",
            components.len(),
            components.iter().map(|c| c.len()).collect::<Vec<_>>()
        );
        components.into_iter().next().unwrap_or_default()
    };
    let relevant = scope
        .iter()
        .filter(|s| special.contains(s))
        .copied()
        .collect::<Vec<_>>();

    let mut delta = 0;
    let mut sentinel_pairs = 0;
    for (idx, src) in relevant.iter().enumerate() {
        let changes = line_changes_from(*src, graph, station_lines, Some(&scope))?;
        for dst in relevant[idx + 1..].iter() {
            let distance = match changes.get(dst) {
                Some(c) => *c,
                None => {
                    sentinel_pairs += 1;
                    n_lines
                }
            };
            delta = delta.max(distance);
        }
    }
    if sentinel_pairs > 0 {
        log::warn!(
            "{sentinel_pairs} special vertex pairs have no line-aware route, counted as {n_lines} changes"
        );
    }

    Ok(LineChangeDiameter {
        delta,
        approximate: !connected,
        evaluated_vertices: relevant.len(),
        sentinel_pairs,
    })
}
