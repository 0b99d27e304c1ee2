use serde::{Deserialize, Serialize};

use crate::model::ResilienceError;

/// parameters used while building the stop-level graph
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "snake_case")]
pub struct NetworkConfig {
    /// speed used to estimate a segment's travel time from its length when the
    /// schedule has no usable observation
    pub average_speed_kmh: f64,
    /// observed segment times at or above this value are treated as schedule noise
    pub max_segment_minutes: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 35.0,
            max_segment_minutes: 30.0,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ResilienceError> {
        if !(self.average_speed_kmh.is_finite() && self.average_speed_kmh > 0.0) {
            return Err(ResilienceError::ConfigurationError(format!(
                "average_speed_kmh must be positive, found {}",
                self.average_speed_kmh
            )));
        }
        if !(self.max_segment_minutes.is_finite() && self.max_segment_minutes > 0.0) {
            return Err(ResilienceError::ConfigurationError(format!(
                "max_segment_minutes must be positive, found {}",
                self.max_segment_minutes
            )));
        }
        Ok(())
    }

    /// minutes needed to cover `distance_km` at the configured average speed
    pub fn estimate_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.average_speed_kmh * 60.0
    }
}
