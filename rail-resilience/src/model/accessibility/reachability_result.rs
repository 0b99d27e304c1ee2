use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::AreaMethod;
use crate::model::station::StationId;

/// reachability of the whole network within one travel-time threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityResult {
    pub threshold_minutes: f64,
    /// stations reachable from each station within the threshold, itself included
    pub reachable: BTreeMap<StationId, BTreeSet<StationId>>,
    pub average_reachable: f64,
    /// upper median of the per-station reachable counts
    pub median_reachable: usize,
    /// Σ reachable counts / n²
    pub reachability_fraction: f64,
    /// longest finite shortest travel time between any two stations, regardless of
    /// threshold
    pub max_travel_time_minutes: f64,
    /// station whose reachable count is closest to the average
    pub representative_station: Option<StationId>,
    pub area_km2: f64,
    pub area_method: AreaMethod,
    /// SME: reachable area over route length per capita (per thousand people).
    /// only meaningful for comparing thresholds or networks.
    pub score: f64,
}

impl ReachabilityResult {
    pub fn reachable_count(&self, station_id: &StationId) -> usize {
        self.reachable
            .get(station_id)
            .map(|r| r.len())
            .unwrap_or(0)
    }
}
