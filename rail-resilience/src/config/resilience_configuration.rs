use serde::{Deserialize, Serialize};

use super::{AccessibilityConfig, IndicatorConfig, NetworkConfig, ScenarioConfig};
use crate::model::ResilienceError;

/// defines behaviors for a full resilience and accessibility run. every section and
/// field may be omitted from a file, in which case the defaults (calibrated for the
/// 2009 Singapore MRT/LRT network) apply.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "snake_case")]
pub struct ResilienceConfiguration {
    pub network: NetworkConfig,
    pub indicators: IndicatorConfig,
    pub scenarios: ScenarioConfig,
    pub accessibility: AccessibilityConfig,
}

impl ResilienceConfiguration {
    pub fn validate(&self) -> Result<(), ResilienceError> {
        self.network.validate()?;
        self.indicators.validate()?;
        self.scenarios.validate()?;
        self.accessibility.validate()?;
        Ok(())
    }
}

impl TryFrom<&String> for ResilienceConfiguration {
    type Error = ResilienceError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let conf: ResilienceConfiguration = if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                ResilienceError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                ResilienceError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                ResilienceError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                ResilienceError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(ResilienceError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()?;
        Ok(conf)
    }
}
