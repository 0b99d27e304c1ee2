use std::f64::consts::PI;

use uom::si::f64::Length;

use super::Indicators;
use crate::{
    algorithm::line_change_diameter,
    config::{IndicatorConfig, RegressionCoefficients},
    model::{
        network::{SpecialGraph, Topology},
        ResilienceError,
    },
};

/// computes coverage, directness and connectivity for a topology snapshot.
///
/// * σ = n_served · π · r² / A
/// * τ = n_L / δ, or 1 when δ is 0
/// * ρ = max(0, (Σ_transfer (lines − 1) − e_m) / v_t), or 0 without transfers
///
/// δ is taken over the special vertices of `special_graph`, restricted to its
/// largest component when it is disconnected (see [`Indicators::delta_approximate`]).
pub fn compute_indicators(
    topology: &Topology,
    special_graph: &SpecialGraph,
    total_length: Length,
    n_lines: usize,
    config: &IndicatorConfig,
) -> Result<Indicators, ResilienceError> {
    let v_t = topology.transfer.len();
    let v_e = topology.terminal_only().len();
    let e_s = topology.single_use_edges;
    let e_m = topology.multiple_use_edges;
    let n_served = topology.n_served();

    let sigma =
        n_served as f64 * PI * config.coverage_radius_km.powi(2) / config.service_area_km2;

    let diameter = line_change_diameter(
        special_graph,
        &topology.special,
        &topology.station_lines,
        n_lines,
    )?;
    let tau = if diameter.delta > 0 {
        n_lines as f64 / diameter.delta as f64
    } else {
        1.0
    };

    let transfer_possibilities: usize = topology
        .transfer
        .iter()
        .map(|s| topology.lines_at(s).saturating_sub(1))
        .sum();
    let rho = if v_t > 0 {
        ((transfer_possibilities as f64 - e_m as f64) / v_t as f64).max(0.0)
    } else {
        0.0
    };

    log::debug!(
        "indicators: σ={sigma:.4} τ={tau:.4} (δ={}) ρ={rho:.4} v_t={v_t} v_e={v_e} e_s={e_s} e_m={e_m}",
        diameter.delta
    );
    Ok(Indicators {
        sigma,
        tau,
        rho,
        v: v_t + v_e,
        v_t,
        v_e,
        e: e_s + e_m,
        e_s,
        e_m,
        delta: diameter.delta,
        delta_approximate: diameter.approximate,
        sentinel_pairs: diameter.sentinel_pairs,
        n_served,
        n_lines,
        service_area_km2: config.service_area_km2,
        total_length,
    })
}

/// predicted boardings per capita from the D&K regression
pub fn predict_performance(indicators: &Indicators, coefficients: &RegressionCoefficients) -> f64 {
    coefficients.coverage * indicators.sigma
        + coefficients.directness * indicators.tau
        + coefficients.connectivity * indicators.rho
        + coefficients.intercept
}

/// disrupted performance relative to the baseline, 0 when the baseline is not positive
pub fn performance_ratio(scenario: f64, baseline: f64) -> f64 {
    if baseline > 0.0 && baseline.is_finite() {
        scenario / baseline
    } else {
        0.0
    }
}
