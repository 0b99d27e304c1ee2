use serde::{Deserialize, Serialize};

use crate::model::ResilienceError;

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "snake_case")]
pub struct AccessibilityConfig {
    pub time_thresholds_minutes: Vec<f64>,
    /// population of the served region, used to normalize network length
    pub population: f64,
    /// area credited per reachable station when the convex hull cannot be used
    pub area_per_station_km2: f64,
    /// run the per-station searches on the rayon thread pool
    pub parallelize: bool,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            time_thresholds_minutes: vec![20.0, 30.0, 45.0, 60.0],
            population: 5_453_600.0,
            area_per_station_km2: 2.0,
            parallelize: false,
        }
    }
}

impl AccessibilityConfig {
    pub fn validate(&self) -> Result<(), ResilienceError> {
        if let Some(t) = self
            .time_thresholds_minutes
            .iter()
            .find(|t| !(t.is_finite() && **t >= 0.0))
        {
            return Err(ResilienceError::InvalidThreshold(*t));
        }
        if !(self.population.is_finite() && self.population > 0.0) {
            return Err(ResilienceError::ConfigurationError(format!(
                "population must be positive, found {}",
                self.population
            )));
        }
        if !(self.area_per_station_km2.is_finite() && self.area_per_station_km2 > 0.0) {
            return Err(ResilienceError::ConfigurationError(format!(
                "area_per_station_km2 must be positive, found {}",
                self.area_per_station_km2
            )));
        }
        Ok(())
    }
}
