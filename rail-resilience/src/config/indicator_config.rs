use serde::{Deserialize, Serialize};

use crate::model::ResilienceError;

/// linear model relating the D&K indicators to boardings per capita.
/// defaults are the published Derrible & Kennedy calibration.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct RegressionCoefficients {
    pub coverage: f64,
    pub directness: f64,
    pub connectivity: f64,
    pub intercept: f64,
}

impl Default for RegressionCoefficients {
    fn default() -> Self {
        Self {
            coverage: 44.963,
            directness: 7.579,
            connectivity: 92.316,
            intercept: 102.947,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "snake_case")]
pub struct IndicatorConfig {
    /// walking catchment radius around each station
    pub coverage_radius_km: f64,
    /// area of the metropolitan region the network serves
    pub service_area_km2: f64,
    pub regression: RegressionCoefficients,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            coverage_radius_km: 0.5,
            service_area_km2: 734.3,
            regression: RegressionCoefficients::default(),
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ResilienceError> {
        if !(self.coverage_radius_km.is_finite() && self.coverage_radius_km > 0.0) {
            return Err(ResilienceError::ConfigurationError(format!(
                "coverage_radius_km must be positive, found {}",
                self.coverage_radius_km
            )));
        }
        if !(self.service_area_km2.is_finite() && self.service_area_km2 > 0.0) {
            return Err(ResilienceError::ConfigurationError(format!(
                "service_area_km2 must be positive, found {}",
                self.service_area_km2
            )));
        }
        let r = &self.regression;
        let all_finite = [r.coverage, r.directness, r.connectivity, r.intercept]
            .iter()
            .all(|c| c.is_finite());
        if !all_finite {
            return Err(ResilienceError::ConfigurationError(String::from(
                "regression coefficients must be finite",
            )));
        }
        Ok(())
    }
}
