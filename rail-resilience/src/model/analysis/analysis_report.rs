use serde::Serialize;

use crate::model::{
    accessibility::ReachabilityResult,
    indicator::Indicators,
    network::{FullGraph, Line, SpecialGraph, Topology},
    scenario::{FriSummary, Scenario},
    station::Station,
};

/// everything produced by one end-to-end run. the graphs are kept for further
/// queries but left out of serialized reports.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub n_stops: usize,
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
    pub topology: Topology,
    #[serde(skip)]
    pub full_graph: FullGraph,
    #[serde(skip)]
    pub special_graph: SpecialGraph,
    pub baseline: Indicators,
    /// predicted boardings per capita of the intact network
    pub baseline_performance: f64,
    pub scenarios: Vec<Scenario>,
    /// None when no scenario was configured
    pub fri: Option<FriSummary>,
    pub accessibility: Vec<ReachabilityResult>,
}
