#![allow(dead_code)]

use itertools::Itertools;
use rail_resilience::{
    build_topology,
    config::NetworkConfig,
    model::network::{RouteSequence, TravelTimeTable},
    RawStop, StationCatalog, TransitNetwork,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// five lines around a central interchange B:
///
/// ```text
///   L1 A-B-C   L2 D-B-E   L3 A-F-D   L4 C-G-E   L5 D-H-E
/// ```
///
/// A, B, C, D and E are all transfers, so every pair is one change apart.
pub fn hub_stops() -> Vec<RawStop> {
    vec![
        RawStop::new("a", "Alpha", 1.30, 103.80),
        RawStop::new("b", "Bravo", 1.30, 103.82),
        RawStop::new("c", "Charlie", 1.30, 103.84),
        RawStop::new("d", "Delta", 1.32, 103.82),
        RawStop::new("e", "Echo", 1.28, 103.82),
        RawStop::new("f", "Foxtrot", 1.31, 103.81),
        RawStop::new("g", "Golf", 1.29, 103.83),
        RawStop::new("h", "Hotel", 1.30, 103.85),
    ]
}

pub fn hub_routes() -> Vec<RouteSequence> {
    let both_ways = |name: &str, stops: Vec<&str>| {
        let reversed = stops.iter().rev().copied().collect_vec();
        RouteSequence::new(name, vec![stops, reversed])
    };
    vec![
        both_ways("L1", vec!["a", "b", "c"]),
        both_ways("L2", vec!["d", "b", "e"]),
        both_ways("L3", vec!["a", "f", "d"]),
        both_ways("L4", vec!["c", "g", "e"]),
        both_ways("L5", vec!["d", "h", "e"]),
    ]
}

pub fn hub_network() -> TransitNetwork {
    let catalog = StationCatalog::from_stops(&hub_stops()).expect("valid stops");
    build_topology(
        &catalog,
        &hub_routes(),
        &TravelTimeTable::empty(),
        &NetworkConfig::default(),
    )
    .expect("valid network")
}

/// a `rows` x `cols` grid of stations, one line per row and one per column
pub fn grid_stops(rows: usize, cols: usize) -> Vec<RawStop> {
    (0..rows)
        .cartesian_product(0..cols)
        .map(|(r, c)| {
            RawStop::new(
                &format!("s{r}_{c}"),
                &format!("Station {r}-{c}"),
                1.25 + 0.01 * r as f64,
                103.70 + 0.01 * c as f64,
            )
        })
        .collect()
}

pub fn grid_routes(rows: usize, cols: usize) -> Vec<RouteSequence> {
    let row_lines = (0..rows).map(|r| RouteSequence {
        line_name: format!("R{r:02}"),
        trips: vec![(0..cols).map(|c| format!("s{r}_{c}")).collect()],
    });
    let col_lines = (0..cols).map(|c| RouteSequence {
        line_name: format!("C{c:02}"),
        trips: vec![(0..rows).map(|r| format!("s{r}_{c}")).collect()],
    });
    row_lines.chain(col_lines).collect()
}

pub fn grid_network(rows: usize, cols: usize) -> TransitNetwork {
    let catalog = StationCatalog::from_stops(&grid_stops(rows, cols)).expect("valid stops");
    build_topology(
        &catalog,
        &grid_routes(rows, cols),
        &TravelTimeTable::empty(),
        &NetworkConfig::default(),
    )
    .expect("valid network")
}

/// four stations in a row with two lines sharing the middle segment:
///
/// ```text
///   L1 A-B-C-D   L2 B-C
/// ```
pub fn shared_segment_stops() -> Vec<RawStop> {
    vec![
        RawStop::new("a", "A", 1.30, 103.80),
        RawStop::new("b", "B", 1.30, 103.81),
        RawStop::new("c", "C", 1.30, 103.82),
        RawStop::new("d", "D", 1.30, 103.83),
    ]
}

pub fn shared_segment_routes() -> Vec<RouteSequence> {
    vec![
        RouteSequence::new("L1", vec![vec!["a", "b", "c", "d"], vec!["d", "c", "b", "a"]]),
        RouteSequence::new("L2", vec![vec!["b", "c"], vec!["c", "b"]]),
    ]
}

pub fn shared_segment_network() -> TransitNetwork {
    let catalog = StationCatalog::from_stops(&shared_segment_stops()).expect("valid stops");
    build_topology(
        &catalog,
        &shared_segment_routes(),
        &TravelTimeTable::empty(),
        &NetworkConfig::default(),
    )
    .expect("valid network")
}
