//! Derrible & Kennedy (D&K) structural indicators, failure-scenario resilience and
//! time-bounded accessibility for rail transit networks.
//!
//! The crate consumes in-memory station, route and travel-time tables and produces
//! structured results; reading schedule feeds and writing reports is left to callers.
pub mod algorithm;
pub mod config;
pub mod model;

pub use config::ResilienceConfiguration;
pub use model::accessibility::{compute_accessibility, ReachabilityResult};
pub use model::analysis::{run_analysis, AnalysisReport};
pub use model::indicator::{compute_indicators, performance_ratio, predict_performance, Indicators};
pub use model::network::{build_topology, FullGraph, SpecialGraph, Topology, TransitNetwork};
pub use model::scenario::{simulate_scenarios, FriSummary, Scenario};
pub use model::station::{RawStop, Station, StationCatalog, StationId};
pub use model::ResilienceError;
