use std::collections::{BTreeSet, HashMap};

use geo::{Centroid, MultiPoint, Point};
use indexmap::IndexMap;
use itertools::Itertools;

use super::{RawStop, Station, StationId};
use crate::model::ResilienceError;

/// stops are grouped either by the parent reference the feed provides or, failing
/// that, by their normalized name. the two key spaces are kept apart so a parent id
/// that happens to equal some stop name cannot pull unrelated stops together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Parent(String),
    Name(String),
}

/// arena of logical stations with the total mapping from raw stop id to station.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
    stop_lookup: HashMap<String, StationId>,
}

impl StationCatalog {
    /// merges raw stop records into logical stations.
    ///
    /// stops sharing a parent reference form one station; stops without a parent are
    /// grouped by name with any parenthetical suffix (platform, exit) removed. each
    /// station sits at the centroid of its stops and takes the shortest stop name.
    /// station ids follow the order in which groups are first seen, so the result is
    /// deterministic for a given input order.
    pub fn from_stops(stops: &[RawStop]) -> Result<StationCatalog, ResilienceError> {
        let mut groups: IndexMap<GroupKey, Vec<&RawStop>> = IndexMap::new();
        let mut seen_ids: HashMap<&str, usize> = HashMap::with_capacity(stops.len());
        for (idx, stop) in stops.iter().enumerate() {
            validate_stop(stop)?;
            if let Some(prev) = seen_ids.insert(stop.stop_id.as_str(), idx) {
                return Err(ResilienceError::InvalidStationData(format!(
                    "stop id '{}' appears at rows {} and {}",
                    stop.stop_id, prev, idx
                )));
            }
            let key = match stop.parent() {
                Some(parent) => GroupKey::Parent(parent.to_string()),
                None => GroupKey::Name(normalize_station_name(&stop.name)),
            };
            groups.entry(key).or_default().push(stop);
        }

        let mut stations: Vec<Station> = Vec::with_capacity(groups.len());
        let mut stop_lookup: HashMap<String, StationId> = HashMap::with_capacity(stops.len());
        for (idx, members) in groups.into_values().enumerate() {
            let station = consolidate(StationId(idx), &members)?;
            for stop_id in station.stop_ids.iter() {
                stop_lookup.insert(stop_id.clone(), station.id);
            }
            stations.push(station);
        }

        log::info!(
            "merged {} stops into {} unique stations",
            stops.len(),
            stations.len()
        );
        Ok(StationCatalog {
            stations,
            stop_lookup,
        })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn get(&self, station_id: &StationId) -> Option<&Station> {
        self.stations.get(station_id.0)
    }

    /// the station a raw stop was merged into
    pub fn station_for_stop(&self, stop_id: &str) -> Option<StationId> {
        self.stop_lookup.get(stop_id).copied()
    }

    pub fn n_stops(&self) -> usize {
        self.stop_lookup.len()
    }
}

/// strips a parenthetical suffix such as "Dhoby Ghaut (NS24)" down to "Dhoby Ghaut".
pub fn normalize_station_name(name: &str) -> String {
    match name.find('(') {
        Some(idx) => name[..idx].trim().to_string(),
        None => name.trim().to_string(),
    }
}

fn validate_stop(stop: &RawStop) -> Result<(), ResilienceError> {
    let lat_ok = stop.lat.is_finite() && (-90.0..=90.0).contains(&stop.lat);
    let lon_ok = stop.lon.is_finite() && (-180.0..=180.0).contains(&stop.lon);
    if !lat_ok || !lon_ok {
        return Err(ResilienceError::InvalidStationData(format!(
            "stop '{}' has invalid coordinates ({}, {})",
            stop.stop_id, stop.lat, stop.lon
        )));
    }
    Ok(())
}

fn consolidate(id: StationId, members: &[&RawStop]) -> Result<Station, ResilienceError> {
    let points = members
        .iter()
        .map(|s| Point::new(s.lon, s.lat))
        .collect_vec();
    let point = MultiPoint::from(points).centroid().ok_or_else(|| {
        ResilienceError::InternalError(format!("station {id} has no stops to locate it"))
    })?;
    let shortest = members
        .iter()
        .map(|s| s.name.as_str())
        .min_by_key(|n| n.chars().count())
        .ok_or_else(|| ResilienceError::InternalError(format!("station {id} has no stops")))?;

    Ok(Station {
        id,
        name: normalize_station_name(shortest),
        point,
        stop_ids: members.iter().map(|s| s.stop_id.clone()).collect(),
        lines: BTreeSet::new(),
        is_transfer: false,
        is_terminal: false,
    })
}
