use std::collections::BTreeMap;

use indexmap::IndexMap;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::{FailureMode, FailureType, Scenario};

/// Functional Resilience Index: performance ratios of a scenario run, aggregated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriSummary {
    /// mean performance ratio over every scenario
    pub overall: f64,
    pub by_type: BTreeMap<FailureType, f64>,
    /// random scenarios grouped by failure probability, in run order
    pub by_probability: Vec<ProbabilitySummary>,
    /// targeted scenarios grouped by failure type and removal count
    pub by_target_count: Vec<TargetedSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbabilitySummary {
    pub probability: f64,
    pub mean: f64,
    /// sample standard deviation, None for a single trial
    pub std_dev: Option<f64>,
    pub trials: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetedSummary {
    pub failure_type: FailureType,
    pub count: usize,
    pub mean: f64,
}

impl FriSummary {
    /// aggregates scenario ratios, or None when there are no scenarios
    pub fn from_scenarios(scenarios: &[Scenario]) -> Option<FriSummary> {
        if scenarios.is_empty() {
            return None;
        }
        let overall = mean(scenarios.iter().map(|s| s.performance_ratio))?;

        let by_type = scenarios
            .iter()
            .into_group_map_by(|s| s.failure_type())
            .into_iter()
            .filter_map(|(t, group)| Some((t, mean(group.iter().map(|s| s.performance_ratio))?)))
            .collect::<BTreeMap<_, _>>();

        let mut random: IndexMap<OrderedFloat<f64>, Vec<f64>> = IndexMap::new();
        let mut targeted: BTreeMap<(FailureType, usize), Vec<f64>> = BTreeMap::new();
        for scenario in scenarios.iter() {
            match scenario.mode {
                FailureMode::Random { probability, .. } => random
                    .entry(OrderedFloat(probability))
                    .or_default()
                    .push(scenario.performance_ratio),
                FailureMode::Degree { count } | FailureMode::Betweenness { count } => targeted
                    .entry((scenario.failure_type(), count))
                    .or_default()
                    .push(scenario.performance_ratio),
            }
        }

        let by_probability = random
            .into_iter()
            .filter_map(|(OrderedFloat(probability), ratios)| {
                Some(ProbabilitySummary {
                    probability,
                    mean: mean(ratios.iter().copied())?,
                    std_dev: sample_std_dev(&ratios),
                    trials: ratios.len(),
                })
            })
            .collect_vec();
        let by_target_count = targeted
            .into_iter()
            .filter_map(|((failure_type, count), ratios)| {
                Some(TargetedSummary {
                    failure_type,
                    count,
                    mean: mean(ratios.into_iter())?,
                })
            })
            .collect_vec();

        log::info!("FRI over {} scenarios: {:.4}", scenarios.len(), overall);
        for (t, m) in by_type.iter() {
            log::info!("  {t}: {m:.4}");
        }
        Some(FriSummary {
            overall,
            by_type,
            by_probability,
            by_target_count,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
