use super::AnalysisReport;
use crate::{
    config::ResilienceConfiguration,
    model::{
        accessibility::compute_accessibility,
        indicator::{compute_indicators, predict_performance},
        network::{build_topology, RouteSequence, TravelTimeTable},
        scenario::{simulate_scenarios, FriSummary},
        station::{RawStop, StationCatalog},
        ResilienceError,
    },
};

/// runs the whole pipeline: station deduplication, topology, baseline indicators,
/// failure scenarios with their FRI summary, then accessibility.
pub fn run_analysis(
    stops: &[RawStop],
    routes: &[RouteSequence],
    travel_times: &TravelTimeTable,
    config: &ResilienceConfiguration,
) -> Result<AnalysisReport, ResilienceError> {
    config.validate()?;
    let catalog = StationCatalog::from_stops(stops)?;
    let network = build_topology(&catalog, routes, travel_times, &config.network)?;
    let topology = &network.topology;

    let baseline = compute_indicators(
        topology,
        &network.special_graph,
        topology.total_length,
        topology.n_lines,
        &config.indicators,
    )?;
    let baseline_performance = predict_performance(&baseline, &config.indicators.regression);
    log::info!(
        "baseline: σ={:.4} τ={:.4} ρ={:.4} δ={}, predicted boardings per capita {:.2}",
        baseline.sigma,
        baseline.tau,
        baseline.rho,
        baseline.delta,
        baseline_performance
    );

    let scenarios = simulate_scenarios(
        &network.special_graph,
        &network.full_graph,
        topology,
        &network.stations,
        &config.scenarios,
        &config.indicators,
    )?;
    let fri = FriSummary::from_scenarios(&scenarios);

    let accessibility = compute_accessibility(
        &network.full_graph,
        &network.stations,
        topology.total_length,
        &config.accessibility,
    )?;

    Ok(AnalysisReport {
        n_stops: catalog.n_stops(),
        stations: network.stations,
        lines: network.lines,
        topology: network.topology,
        full_graph: network.full_graph,
        special_graph: network.special_graph,
        baseline,
        baseline_performance,
        scenarios,
        fri,
        accessibility,
    })
}
