mod common;

use std::collections::BTreeSet;

use geo::Point;
use itertools::Itertools;
use proptest::prelude::*;
use rail_resilience::{
    build_topology, compute_accessibility,
    config::{AccessibilityConfig, IndicatorConfig, NetworkConfig, ScenarioConfig},
    model::{
        network::{FullEdge, RouteSequence, TravelTimeTable},
        scenario::FailureType,
    },
    simulate_scenarios, FullGraph, RawStop, Station, StationCatalog, StationId,
};
use uom::si::{f64::Length, length::kilometer};

fn station(idx: usize, n: usize) -> Station {
    let angle = std::f64::consts::TAU * idx as f64 / n as f64;
    Station {
        id: StationId(idx),
        name: format!("S{idx}"),
        point: Point::new(103.8 + 0.05 * angle.cos(), 1.3 + 0.05 * angle.sin()),
        stop_ids: vec![format!("s{idx}")],
        lines: BTreeSet::new(),
        is_transfer: false,
        is_terminal: false,
    }
}

/// (station count, weighted edges)
fn weighted_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (3usize..10).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 0.5f64..20.0), 0..20),
        )
    })
}

/// (station count, lines as sequences of distinct station indices)
fn line_network() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (4usize..10).prop_flat_map(|n| {
        let line = prop::sample::subsequence((0..n).collect_vec(), 2..=n).prop_shuffle();
        (Just(n), prop::collection::vec(line, 1..4))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn reachable_sets_grow_with_threshold(
        (n, edges) in weighted_graph(),
        low in 0.0f64..40.0,
        extra in 0.0f64..40.0,
    ) {
        let mut graph = FullGraph::empty();
        for i in 0..n {
            graph.add_node(StationId(i));
        }
        for (a, b, minutes) in edges.into_iter().filter(|(a, b, _)| a != b) {
            graph
                .upsert_edge(StationId(a), StationId(b), || FullEdge {
                    lines: BTreeSet::new(),
                    travel_time_minutes: minutes,
                    travel_time_estimated: false,
                    distance: Length::new::<kilometer>(1.0),
                })
                .expect("distinct endpoints");
        }
        let stations = (0..n).map(|i| station(i, n)).collect_vec();
        let config = AccessibilityConfig {
            time_thresholds_minutes: vec![low, low + extra],
            ..Default::default()
        };
        let results = compute_accessibility(&graph, &stations, Length::new::<kilometer>(10.0), &config)
            .expect("valid inputs");
        for i in 0..n {
            let src = StationId(i);
            let near = &results[0].reachable[&src];
            let far = &results[1].reachable[&src];
            prop_assert!(near.contains(&src));
            prop_assert!(near.is_subset(far));
        }
        prop_assert!(results[0].average_reachable <= results[1].average_reachable);
    }

    #[test]
    fn reachable_pairs_shrink_along_targeted_prefix((n, lines) in line_network()) {
        let stops = (0..n)
            .map(|i| {
                let s = station(i, n);
                RawStop::new(&format!("s{i}"), &s.name, s.lat(), s.lon())
            })
            .collect_vec();
        let routes = lines
            .iter()
            .enumerate()
            .map(|(j, seq)| RouteSequence {
                line_name: format!("L{j}"),
                trips: vec![seq.iter().map(|i| format!("s{i}")).collect()],
            })
            .collect_vec();
        let catalog = StationCatalog::from_stops(&stops).expect("valid stops");
        let network = build_topology(&catalog, &routes, &TravelTimeTable::empty(), &NetworkConfig::default())
            .expect("valid network");
        let config = ScenarioConfig {
            failure_probabilities: vec![],
            targeted_counts: (1..n).collect(),
            ..Default::default()
        };
        let scenarios = simulate_scenarios(
            &network.special_graph,
            &network.full_graph,
            &network.topology,
            &network.stations,
            &config,
            &IndicatorConfig::default(),
        )
        .expect("valid scenarios");

        for failure_type in [FailureType::Degree, FailureType::Betweenness] {
            let fractions = scenarios
                .iter()
                .filter(|s| s.failure_type() == failure_type)
                .sorted_by_key(|s| s.failed_count())
                .map(|s| s.reachable_pair_fraction)
                .collect_vec();
            for (before, after) in fractions.iter().tuple_windows() {
                prop_assert!(after <= before, "{failure_type}: {before} then {after}");
            }
        }
    }
}
