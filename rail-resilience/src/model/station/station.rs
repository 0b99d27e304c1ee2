use std::collections::BTreeSet;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::StationId;
use crate::model::network::LineId;

/// a logical station aggregating one or more raw stops.
///
/// identity, name, location and stop ids are fixed at deduplication. the serving
/// lines and the transfer/terminal flags are filled in once by the topology builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// x = longitude, y = latitude
    pub point: Point<f64>,
    pub stop_ids: Vec<String>,
    pub lines: BTreeSet<LineId>,
    pub is_transfer: bool,
    pub is_terminal: bool,
}

impl Station {
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    /// true if at least one line stops here
    pub fn is_served(&self) -> bool {
        !self.lines.is_empty()
    }

    /// D&K special vertex: transfer, terminal, or both
    pub fn is_special(&self) -> bool {
        self.is_transfer || self.is_terminal
    }
}
