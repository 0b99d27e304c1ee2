mod accessibility_config;
mod indicator_config;
mod network_config;
mod resilience_configuration;
mod scenario_config;

pub use accessibility_config::AccessibilityConfig;
pub use indicator_config::{IndicatorConfig, RegressionCoefficients};
pub use network_config::NetworkConfig;
pub use resilience_configuration::ResilienceConfiguration;
pub use scenario_config::ScenarioConfig;
