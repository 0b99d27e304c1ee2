use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::LineId;
use crate::model::station::StationId;

/// stop sequences of one route as they come from the schedule, one entry per trip.
/// several routes that share a short name are merged into a single [`Line`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSequence {
    /// route short name, e.g. "NS" or "U2"
    pub line_name: String,
    /// ordered raw stop ids for each trip variant
    pub trips: Vec<Vec<String>>,
}

impl RouteSequence {
    pub fn new(line_name: &str, trips: Vec<Vec<&str>>) -> RouteSequence {
        RouteSequence {
            line_name: line_name.to_string(),
            trips: trips
                .into_iter()
                .map(|t| t.into_iter().map(String::from).collect())
                .collect(),
        }
    }
}

/// a service line after its trips have been mapped onto logical stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    /// every station visited by any trip variant
    pub stations: BTreeSet<StationId>,
    /// station sequence of each trip variant, with unknown stops dropped
    pub trips: Vec<Vec<StationId>>,
    /// great-circle length of the edges this line runs on
    pub length: Length,
}

impl Line {
    pub fn new(id: LineId, name: &str) -> Line {
        Line {
            id,
            name: name.to_string(),
            stations: BTreeSet::new(),
            trips: vec![],
            length: Length::new::<uom::si::length::meter>(0.0),
        }
    }
}
