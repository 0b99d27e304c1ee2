use std::{
    cmp::Reverse,
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

use itertools::Itertools;
use kdam::{tqdm, Bar, BarExt};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use super::{FailureMode, Scenario};
use crate::{
    algorithm::{betweenness_centrality, connected_components},
    config::{IndicatorConfig, ScenarioConfig},
    model::{
        indicator::{compute_indicators, performance_ratio, predict_performance},
        network::{station_names, FullGraph, SpecialGraph, Topology},
        station::{Station, StationId},
        ResilienceError,
    },
};

/// the stations to fail in one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct FailurePlan {
    pub mode: FailureMode,
    pub failed: BTreeSet<StationId>,
}

/// baseline state shared read-only by every trial
struct Baseline<'a> {
    special_graph: &'a SpecialGraph,
    full_graph: &'a FullGraph,
    topology: &'a Topology,
    stations: &'a [Station],
    indicator_config: &'a IndicatorConfig,
    performance: f64,
}

/// simulates random and targeted station failures against the baseline network.
///
/// every trial removes its failed stations from copies of both graphs, recomputes
/// the indicators on the reduced topology and compares the predicted performance
/// with the baseline. fragmentation is measured on the reduced stop-level graph.
/// the baseline graphs and topology are never modified.
///
/// # Arguments
///
/// * `special_graph` - baseline D&K graph
/// * `full_graph` - baseline stop-level graph
/// * `topology` - baseline topology
/// * `stations` - station arena, used for failed-station names
/// * `config` - scenarios to run
/// * `indicator_config` - indicator constants and regression coefficients
///
/// # Returns
///
/// One record per trial: random scenarios first, then degree-targeted, then
/// betweenness-targeted, each in configured order.
pub fn simulate_scenarios(
    special_graph: &SpecialGraph,
    full_graph: &FullGraph,
    topology: &Topology,
    stations: &[Station],
    config: &ScenarioConfig,
    indicator_config: &IndicatorConfig,
) -> Result<Vec<Scenario>, ResilienceError> {
    config.validate()?;
    indicator_config.validate()?;
    if full_graph.is_empty() {
        return Err(ResilienceError::EmptyNetwork);
    }
    let baseline_indicators = compute_indicators(
        topology,
        special_graph,
        topology.total_length,
        topology.n_lines,
        indicator_config,
    )?;
    let baseline = Baseline {
        special_graph,
        full_graph,
        topology,
        stations,
        indicator_config,
        performance: predict_performance(&baseline_indicators, &indicator_config.regression),
    };
    log::info!(
        "baseline predicted boardings per capita: {:.2}",
        baseline.performance
    );

    let plans = failure_plans(full_graph, config)?;
    let scenarios = if config.parallelize {
        let bar = Arc::new(Mutex::new(
            Bar::builder()
                .total(plans.len())
                .desc("evaluate failure scenarios")
                .build()
                .map_err(ResilienceError::InternalError)?,
        ));
        plans
            .par_iter()
            .map(|plan| {
                let scenario = evaluate_plan(plan, &baseline);
                if let Ok(mut b) = bar.clone().lock() {
                    let _ = b.update(1);
                }
                scenario
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        tqdm!(
            plans.iter(),
            desc = "evaluate failure scenarios",
            total = plans.len()
        )
        .map(|plan| evaluate_plan(plan, &baseline))
        .collect::<Result<Vec<_>, _>>()?
    };
    eprintln!();

    let counts = scenarios.iter().counts_by(|s| s.failure_type());
    log::info!(
        "simulated {} scenarios: {}",
        scenarios.len(),
        counts
            .iter()
            .sorted()
            .map(|(t, n)| format!("{n} {t}"))
            .join(", ")
    );
    Ok(scenarios)
}

/// chooses the failed stations of every scenario, in run order.
///
/// random draws come from a generator seeded with `config.seed` and are made here,
/// before any trial runs, so results do not depend on how trials are scheduled.
/// probabilities yielding zero stations and targeted counts at or above the station
/// count produce no plan. betweenness plans are only produced for a connected graph.
pub fn failure_plans(
    full_graph: &FullGraph,
    config: &ScenarioConfig,
) -> Result<Vec<FailurePlan>, ResilienceError> {
    let nodes = full_graph.nodes().collect_vec();
    let n = nodes.len();
    let mut plans: Vec<FailurePlan> = vec![];

    let mut rng = StdRng::seed_from_u64(config.seed);
    for probability in config.failure_probabilities.iter() {
        let count = (n as f64 * probability).floor() as usize;
        if count == 0 {
            log::debug!("failure probability {probability} removes no station, skipping");
            continue;
        }
        for repetition in 0..config.repetitions {
            let failed = rand::seq::index::sample(&mut rng, n, count)
                .into_iter()
                .map(|idx| nodes[idx])
                .collect::<BTreeSet<_>>();
            plans.push(FailurePlan {
                mode: FailureMode::Random {
                    probability: *probability,
                    repetition,
                },
                failed,
            });
        }
    }

    let by_degree = nodes
        .iter()
        .copied()
        .sorted_by_key(|s| Reverse(full_graph.degree(s)))
        .collect_vec();
    plans.extend(targeted_plans(&by_degree, &config.targeted_counts, |count| {
        FailureMode::Degree { count }
    }));

    if connected_components::is_connected(full_graph)? {
        let by_betweenness = betweenness_centrality(full_graph, config.parallelize)
            .into_iter()
            .sorted_by(|(a_id, a), (b_id, b)| b.total_cmp(a).then(a_id.cmp(b_id)))
            .map(|(s, _)| s)
            .collect_vec();
        plans.extend(targeted_plans(
            &by_betweenness,
            &config.targeted_counts,
            |count| FailureMode::Betweenness { count },
        ));
    } else {
        log::warn!("stop-level graph is disconnected, skipping betweenness-targeted scenarios");
    }
    Ok(plans)
}

/// the top-k prefix of a ranking for each configured k below the station count
fn targeted_plans<F>(ranking: &[StationId], counts: &[usize], mode: F) -> Vec<FailurePlan>
where
    F: Fn(usize) -> FailureMode,
{
    counts
        .iter()
        .filter(|k| {
            let keep = **k > 0 && **k < ranking.len();
            if !keep {
                log::debug!(
                    "targeted count {k} is not below the station count {}, skipping",
                    ranking.len()
                );
            }
            keep
        })
        .map(|k| FailurePlan {
            mode: mode(*k),
            failed: ranking[..*k].iter().copied().collect(),
        })
        .collect()
}

fn evaluate_plan(plan: &FailurePlan, baseline: &Baseline) -> Result<Scenario, ResilienceError> {
    let special_graph = baseline.special_graph.without_nodes(&plan.failed);
    let full_graph = baseline.full_graph.without_nodes(&plan.failed);

    let (performance, indicators) = if special_graph.is_empty() {
        (0.0, None)
    } else {
        let snapshot = baseline
            .topology
            .without_stations(&plan.failed, &full_graph);
        let indicators = compute_indicators(
            &snapshot,
            &special_graph,
            snapshot.total_length,
            baseline.topology.n_lines,
            baseline.indicator_config,
        )?;
        let performance =
            predict_performance(&indicators, &baseline.indicator_config.regression);
        (performance, Some(indicators))
    };
    let ratio = match indicators {
        Some(_) => performance_ratio(performance, baseline.performance),
        None => 0.0,
    };

    let n_baseline = baseline.full_graph.n_nodes();
    let (isolated_stations, reachable_pair_fraction) = if full_graph.is_empty() {
        (n_baseline, 0.0)
    } else {
        let largest = connected_components::largest_component(&full_graph)?;
        let reachable = connected_components::reachable_pairs(&full_graph)?;
        let total_pairs = n_baseline * n_baseline.saturating_sub(1) / 2;
        let fraction = if total_pairs > 0 {
            reachable as f64 / total_pairs as f64
        } else {
            0.0
        };
        (full_graph.n_nodes() - largest.len(), fraction)
    };

    log::debug!(
        "{}: {} failed, ratio {:.4}, {} isolated, {:.4} of pairs reachable",
        plan.mode,
        plan.failed.len(),
        ratio,
        isolated_stations,
        reachable_pair_fraction
    );
    Ok(Scenario {
        mode: plan.mode,
        failed: plan.failed.clone(),
        failed_names: station_names(baseline.stations, &plan.failed),
        performance,
        performance_ratio: ratio,
        indicators,
        isolated_stations,
        reachable_pair_fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::model::network::{build_topology, FullEdge, RouteSequence, TravelTimeTable};
    use crate::model::station::{RawStop, StationCatalog};
    use crate::model::scenario::FailureType;
    use uom::si::{f64::Length, length::meter};

    fn full_graph(n: usize, edges: &[(usize, usize)]) -> FullGraph {
        let mut g = FullGraph::empty();
        for i in 0..n {
            g.add_node(StationId(i));
        }
        for (a, b) in edges {
            g.upsert_edge(StationId(*a), StationId(*b), || FullEdge {
                lines: BTreeSet::new(),
                travel_time_minutes: 1.0,
                travel_time_estimated: false,
                distance: Length::new::<meter>(1000.0),
            })
            .expect("test edge");
        }
        g
    }

    fn path(n: usize) -> FullGraph {
        let edges = (1..n).map(|i| (i - 1, i)).collect_vec();
        full_graph(n, &edges)
    }

    fn config(probabilities: Vec<f64>, repetitions: usize, counts: Vec<usize>) -> ScenarioConfig {
        ScenarioConfig {
            failure_probabilities: probabilities,
            repetitions,
            targeted_counts: counts,
            ..Default::default()
        }
    }

    #[test]
    fn test_random_plan_sizes() {
        let g = path(170);
        let plans = failure_plans(&g, &config(vec![0.2, 0.001], 3, vec![])).expect("valid graph");
        let random = plans
            .iter()
            .filter(|p| matches!(p.mode, FailureMode::Random { .. }))
            .collect_vec();
        assert_eq!(random.len(), 3);
        for plan in random {
            assert_eq!(plan.failed.len(), 34);
        }
    }

    #[test]
    fn test_random_plans_are_reproducible() {
        let g = path(50);
        let conf = config(vec![0.1, 0.3], 4, vec![2]);
        let a = failure_plans(&g, &conf).expect("valid graph");
        let b = failure_plans(&g, &conf).expect("valid graph");
        assert_eq!(a, b);
        let other_seed = ScenarioConfig { seed: 7, ..conf };
        let c = failure_plans(&g, &other_seed).expect("valid graph");
        assert_ne!(a, c);
    }

    #[test]
    fn test_plan_order_random_then_degree_then_betweenness() {
        let g = path(20);
        let plans = failure_plans(&g, &config(vec![0.1], 2, vec![1, 2])).expect("valid graph");
        let types = plans.iter().map(|p| p.mode.failure_type()).collect_vec();
        assert_eq!(
            types,
            vec![
                FailureType::Random,
                FailureType::Random,
                FailureType::Degree,
                FailureType::Degree,
                FailureType::Betweenness,
                FailureType::Betweenness,
            ]
        );
    }

    #[test]
    fn test_degree_targets_highest_degree_with_id_tie_break() {
        // 0 is a hub of degree 4, 5 and 6 have degree 2, the rest 1 or 2
        let g = full_graph(8, &[(0, 1), (0, 2), (0, 3), (0, 4), (4, 5), (5, 6), (6, 7)]);
        let plans = failure_plans(&g, &config(vec![], 1, vec![1, 3, 8])).expect("valid graph");
        assert_eq!(plans[0].failed, BTreeSet::from([StationId(0)]));
        assert_eq!(
            plans[1].failed,
            BTreeSet::from([StationId(0), StationId(4), StationId(5)])
        );
        // k at the station count is skipped for both targeted families
        assert!(plans
            .iter()
            .all(|p| !matches!(p.mode, FailureMode::Degree { count: 8 })));
        assert_eq!(plans.len(), 4);
    }

    #[test]
    fn test_betweenness_skipped_when_disconnected() {
        let g = full_graph(4, &[(0, 1), (2, 3)]);
        let plans = failure_plans(&g, &config(vec![], 1, vec![1])).expect("valid graph");
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].mode, FailureMode::Degree { count: 1 });
    }

    #[test]
    fn test_betweenness_targets_center_of_path() {
        let g = path(5);
        let plans = failure_plans(&g, &config(vec![], 1, vec![1])).expect("valid graph");
        let betweenness = plans
            .iter()
            .find(|p| matches!(p.mode, FailureMode::Betweenness { .. }))
            .expect("connected graph has betweenness plans");
        assert_eq!(betweenness.failed, BTreeSet::from([StationId(2)]));
    }

    /// a-b-c-d on line "1" with line "2" crossing at b and c
    fn crossing_network() -> crate::model::network::TransitNetwork {
        let stops = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .enumerate()
            .map(|(i, s)| RawStop::new(s, &s.to_uppercase(), 1.3, 103.8 + 0.01 * i as f64))
            .collect_vec();
        let catalog = StationCatalog::from_stops(&stops).expect("valid stops");
        let routes = vec![
            RouteSequence::new("1", vec![vec!["a", "b", "c", "d"]]),
            RouteSequence::new("2", vec![vec!["e", "b", "c", "f"]]),
        ];
        build_topology(
            &catalog,
            &routes,
            &TravelTimeTable::empty(),
            &NetworkConfig::default(),
        )
        .expect("valid network")
    }

    #[test]
    fn test_no_failure_has_unit_ratio() {
        let net = crossing_network();
        let indicator_config = IndicatorConfig::default();
        let baseline_indicators = compute_indicators(
            &net.topology,
            &net.special_graph,
            net.topology.total_length,
            net.topology.n_lines,
            &indicator_config,
        )
        .expect("valid topology");
        let baseline = Baseline {
            special_graph: &net.special_graph,
            full_graph: &net.full_graph,
            topology: &net.topology,
            stations: &net.stations,
            indicator_config: &indicator_config,
            performance: predict_performance(&baseline_indicators, &indicator_config.regression),
        };
        let plan = FailurePlan {
            mode: FailureMode::Degree { count: 0 },
            failed: BTreeSet::new(),
        };
        let scenario = evaluate_plan(&plan, &baseline).expect("valid plan");
        assert_eq!(scenario.performance_ratio, 1.0);
        assert_eq!(scenario.isolated_stations, 0);
        assert_eq!(scenario.reachable_pair_fraction, 1.0);
    }

    #[test]
    fn test_removing_everything_gives_zero_ratio() {
        let net = crossing_network();
        let conf = config(vec![1.0], 1, vec![]);
        let scenarios = simulate_scenarios(
            &net.special_graph,
            &net.full_graph,
            &net.topology,
            &net.stations,
            &conf,
            &IndicatorConfig::default(),
        )
        .expect("valid scenarios");
        assert_eq!(scenarios.len(), 1);
        let s = &scenarios[0];
        assert_eq!(s.failed_count(), 6);
        assert_eq!(s.performance_ratio, 0.0);
        assert!(s.indicators.is_none());
        assert_eq!(s.isolated_stations, 6);
        assert_eq!(s.reachable_pair_fraction, 0.0);
        assert_eq!(s.failed_names, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_scenarios_leave_baseline_untouched() {
        let net = crossing_network();
        let before = (net.special_graph.n_edges(), net.full_graph.n_edges());
        let scenarios = simulate_scenarios(
            &net.special_graph,
            &net.full_graph,
            &net.topology,
            &net.stations,
            &config(vec![0.5], 3, vec![1, 2]),
            &IndicatorConfig::default(),
        )
        .expect("valid scenarios");
        assert_eq!(scenarios.len(), 3 + 2 + 2);
        assert_eq!(
            before,
            (net.special_graph.n_edges(), net.full_graph.n_edges())
        );
        // the top-degree stations are the crossing points b and c
        let degree_2 = scenarios
            .iter()
            .find(|s| s.mode == FailureMode::Degree { count: 2 })
            .expect("degree scenario");
        assert_eq!(degree_2.failed_names, vec!["B", "C"]);
        assert_eq!(degree_2.isolated_stations, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let net = crossing_network();
        let sequential = config(vec![0.2, 0.5], 4, vec![1, 2, 3]);
        let parallel = ScenarioConfig {
            parallelize: true,
            ..sequential.clone()
        };
        let run = |conf: &ScenarioConfig| {
            simulate_scenarios(
                &net.special_graph,
                &net.full_graph,
                &net.topology,
                &net.stations,
                conf,
                &IndicatorConfig::default(),
            )
            .expect("valid scenarios")
        };
        let a = run(&sequential);
        let b = run(&parallel);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.mode, y.mode);
            assert_eq!(x.failed, y.failed);
            assert_eq!(x.performance_ratio, y.performance_ratio);
        }
    }
}
