use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{FailureMode, FailureType};
use crate::model::{indicator::Indicators, station::StationId};

/// outcome of one simulated failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub mode: FailureMode,
    pub failed: BTreeSet<StationId>,
    /// sorted display names of the failed stations
    pub failed_names: Vec<String>,
    /// predicted boardings per capita, 0 when no D&K vertex survives
    pub performance: f64,
    pub performance_ratio: f64,
    /// None when no D&K vertex survives
    pub indicators: Option<Indicators>,
    /// surviving stations outside the largest stop-level component, or every
    /// baseline station when none survive
    pub isolated_stations: usize,
    /// mutually reachable station pairs over all pairs of the baseline network
    pub reachable_pair_fraction: f64,
}

impl Scenario {
    pub fn failure_type(&self) -> FailureType {
        self.mode.failure_type()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
