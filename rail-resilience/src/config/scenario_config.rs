use serde::{Deserialize, Serialize};

use crate::model::ResilienceError;

/// disruption scenarios to generate. random scenarios run first, probabilities and
/// repetitions in the order given here, followed by degree and betweenness targeted
/// scenarios for each removal count.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "snake_case")]
pub struct ScenarioConfig {
    pub failure_probabilities: Vec<f64>,
    /// random draws per failure probability
    pub repetitions: usize,
    pub targeted_counts: Vec<usize>,
    pub seed: u64,
    /// evaluate trials on the rayon thread pool
    pub parallelize: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            failure_probabilities: vec![0.05, 0.10, 0.15, 0.20],
            repetitions: 10,
            targeted_counts: (1..=8).collect(),
            seed: 42,
            parallelize: false,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), ResilienceError> {
        if let Some(p) = self
            .failure_probabilities
            .iter()
            .find(|p| !(p.is_finite() && (0.0..=1.0).contains(*p)))
        {
            return Err(ResilienceError::InvalidScenarioParameter(format!(
                "failure probability {p} is not within [0, 1]"
            )));
        }
        if self.repetitions == 0 && !self.failure_probabilities.is_empty() {
            return Err(ResilienceError::InvalidScenarioParameter(String::from(
                "repetitions must be at least 1",
            )));
        }
        if self.targeted_counts.contains(&0) {
            return Err(ResilienceError::InvalidScenarioParameter(String::from(
                "targeted removal counts must be positive",
            )));
        }
        Ok(())
    }
}
