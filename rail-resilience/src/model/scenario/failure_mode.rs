use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// scenario family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    Random,
    Degree,
    Betweenness,
}

impl Display for FailureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureType::Random => write!(f, "random"),
            FailureType::Degree => write!(f, "degree"),
            FailureType::Betweenness => write!(f, "betweenness"),
        }
    }
}

/// how the failed stations of one scenario were chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FailureMode {
    /// ⌊N·probability⌋ stations drawn uniformly, one draw per repetition
    Random { probability: f64, repetition: usize },
    /// the `count` stations of highest stop-level degree
    Degree { count: usize },
    /// the `count` stations of highest betweenness centrality
    Betweenness { count: usize },
}

impl FailureMode {
    pub fn failure_type(&self) -> FailureType {
        match self {
            FailureMode::Random { .. } => FailureType::Random,
            FailureMode::Degree { .. } => FailureType::Degree,
            FailureMode::Betweenness { .. } => FailureType::Betweenness,
        }
    }
}

impl Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureMode::Random {
                probability,
                repetition,
            } => write!(f, "random p={probability} run {repetition}"),
            FailureMode::Degree { count } => write!(f, "degree top-{count}"),
            FailureMode::Betweenness { count } => write!(f, "betweenness top-{count}"),
        }
    }
}
