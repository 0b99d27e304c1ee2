use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

use ordered_float::OrderedFloat;

use crate::model::{network::FullGraph, station::StationId, ResilienceError};

/// shortest travel time in minutes from `src` to every station reachable within
/// `cutoff_minutes` (inclusive), using edge travel times as weights. with no cutoff
/// every reachable station is returned. `src` is always in the result at 0.
pub fn travel_times_from(
    src: StationId,
    graph: &FullGraph,
    cutoff_minutes: Option<f64>,
) -> Result<BTreeMap<StationId, f64>, ResilienceError> {
    if !graph.contains_node(&src) {
        return Err(ResilienceError::GraphMissingStation(src));
    }
    if let Some(cutoff) = cutoff_minutes {
        if !(cutoff.is_finite() && cutoff >= 0.0) {
            return Err(ResilienceError::InvalidThreshold(cutoff));
        }
    }
    let within_cutoff = |t: f64| cutoff_minutes.map_or(true, |c| t <= c);

    let mut settled: BTreeMap<StationId, f64> = BTreeMap::new();
    let mut tentative: BTreeMap<StationId, f64> = BTreeMap::from([(src, 0.0)]);
    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f64>, StationId)>> = BinaryHeap::new();
    frontier.push(Reverse((OrderedFloat(0.0), src)));

    while let Some(Reverse((OrderedFloat(time), station))) = frontier.pop() {
        if settled.contains_key(&station) {
            continue;
        }
        settled.insert(station, time);
        for neighbor in graph.neighbors(&station) {
            if settled.contains_key(&neighbor) {
                continue;
            }
            let edge = graph.edge(&station, &neighbor).ok_or_else(|| {
                ResilienceError::InternalError(format!(
                    "adjacency lists {station} -> {neighbor} but no edge exists"
                ))
            })?;
            let next_time = time + edge.travel_time_minutes.max(0.0);
            if !within_cutoff(next_time) {
                continue;
            }
            let improves = tentative
                .get(&neighbor)
                .map_or(true, |prev| next_time < *prev);
            if improves {
                tentative.insert(neighbor, next_time);
                frontier.push(Reverse((OrderedFloat(next_time), neighbor)));
            }
        }
    }

    Ok(settled)
}
