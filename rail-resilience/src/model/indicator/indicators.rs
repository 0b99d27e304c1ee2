use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// D&K structural indicators of one topology snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicators {
    /// coverage σ
    pub sigma: f64,
    /// directness τ
    pub tau: f64,
    /// connectivity ρ
    pub rho: f64,
    /// v = v_t + v_e
    pub v: usize,
    pub v_t: usize,
    /// terminals that are not also transfers
    pub v_e: usize,
    /// e = e_s + e_m
    pub e: usize,
    pub e_s: usize,
    pub e_m: usize,
    /// largest minimum line-change count between special vertices
    pub delta: usize,
    /// δ covers only the largest component of a disconnected D&K graph
    pub delta_approximate: bool,
    /// vertex pairs counted at the unreachable sentinel while computing δ
    pub sentinel_pairs: usize,
    pub n_served: usize,
    pub n_lines: usize,
    pub service_area_km2: f64,
    pub total_length: Length,
}
