use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::LineId;

/// an edge of the D&K graph between two special vertices. it may stand for a run of
/// several stop-level edges through collapsed intermediate stations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialEdge {
    pub lines: BTreeSet<LineId>,
    /// set only when the two special vertices are consecutive stops on some trip
    pub travel_time_minutes: Option<f64>,
    /// true if this edge was added by the repair pass rather than observed on a trip
    pub repaired: bool,
}

impl SpecialEdge {
    pub fn is_multiple_use(&self) -> bool {
        self.lines.len() > 1
    }
}
