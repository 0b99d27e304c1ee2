use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// how the reachable area of a threshold was estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaMethod {
    /// geodesic area of the convex hull around the representative station's
    /// reachable set
    ConvexHull,
    /// average reachable count times a fixed area per station
    PerStationProxy,
}

impl Display for AreaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaMethod::ConvexHull => write!(f, "convex hull"),
            AreaMethod::PerStationProxy => write!(f, "per-station proxy"),
        }
    }
}
