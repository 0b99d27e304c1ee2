use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::LineId;

/// an edge of the stop-level graph. exists iff some trip runs directly between the
/// two stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullEdge {
    pub lines: BTreeSet<LineId>,
    /// averaged scheduled travel time, or an estimate from distance when the
    /// schedule had no usable observation
    pub travel_time_minutes: f64,
    /// true when `travel_time_minutes` was estimated from distance
    pub travel_time_estimated: bool,
    /// great-circle distance between the two stations
    pub distance: Length,
}

impl FullEdge {
    pub fn is_multiple_use(&self) -> bool {
        self.lines.len() > 1
    }
}
