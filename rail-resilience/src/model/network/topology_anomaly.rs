use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::model::station::StationId;

/// data-quality findings from topology construction. these never stop a run but are
/// carried with the topology so callers can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TopologyAnomaly {
    /// a special vertex with no D&K edge after the repair pass
    IsolatedSpecialVertex { station_id: StationId },
    /// a line none of whose stops could be matched to a station
    EmptyLine { line_name: String },
    /// stops referenced by a line that are missing from the station catalog
    UnmappedStops { line_name: String, count: usize },
}

impl Display for TopologyAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyAnomaly::IsolatedSpecialVertex { station_id } => {
                write!(f, "special vertex {station_id} has no D&K edge")
            }
            TopologyAnomaly::EmptyLine { line_name } => {
                write!(f, "line '{line_name}' serves no known station")
            }
            TopologyAnomaly::UnmappedStops { line_name, count } => {
                write!(f, "line '{line_name}' references {count} unknown stops")
            }
        }
    }
}
