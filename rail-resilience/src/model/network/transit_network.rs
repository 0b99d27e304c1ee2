use std::collections::BTreeSet;

use itertools::Itertools;

use super::{FullGraph, Line, SpecialGraph, Topology};
use crate::model::station::{Station, StationId};

/// canonical network built from the schedule: the station arena, the merged lines,
/// both graphs over station ids, and their D&K summary.
#[derive(Debug, Clone)]
pub struct TransitNetwork {
    /// indexed by [`StationId`]
    pub stations: Vec<Station>,
    /// indexed by [`super::LineId`]
    pub lines: Vec<Line>,
    pub topology: Topology,
    pub full_graph: FullGraph,
    pub special_graph: SpecialGraph,
}

impl TransitNetwork {
    pub fn station(&self, station_id: &StationId) -> Option<&Station> {
        self.stations.get(station_id.0)
    }

    pub fn n_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn n_lines(&self) -> usize {
        self.lines.len()
    }

    /// sorted display names of the given stations
    pub fn station_names(&self, station_ids: &BTreeSet<StationId>) -> Vec<String> {
        station_names(&self.stations, station_ids)
    }
}

/// sorted display names of the given stations, falling back to the id for stations
/// missing from `stations`
pub fn station_names(stations: &[Station], station_ids: &BTreeSet<StationId>) -> Vec<String> {
    station_ids
        .iter()
        .map(|id| match stations.iter().find(|s| s.id == *id) {
            Some(s) => s.name.clone(),
            None => id.to_string(),
        })
        .sorted()
        .collect()
}
