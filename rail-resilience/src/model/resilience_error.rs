use thiserror::Error;

use super::station::StationId;

#[derive(Error, Debug)]
pub enum ResilienceError {
    #[error("invalid resilience configuration: {0}")]
    ConfigurationError(String),
    #[error("invalid station data: {0}")]
    InvalidStationData(String),
    #[error("invalid route data: {0}")]
    InvalidRouteData(String),
    #[error("attempting to get station '{0}' not in graph")]
    GraphMissingStation(StationId),
    #[error("cannot connect station '{0}' to itself")]
    SelfLoop(StationId),
    #[error("invalid scenario parameter: {0}")]
    InvalidScenarioParameter(String),
    #[error("invalid time threshold {0}, must be finite and non-negative")]
    InvalidThreshold(f64),
    #[error("network has no stations")]
    EmptyNetwork,
    #[error("{0}")]
    InternalError(String),
}
