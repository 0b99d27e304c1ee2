use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use kdam::tqdm;
use ordered_float::OrderedFloat;
use uom::si::{
    f64::Length,
    length::{kilometer, meter},
};

use super::{
    FullEdge, FullGraph, Line, LineId, RouteSequence, SpecialEdge, SpecialGraph, Topology,
    TopologyAnomaly, TransitNetwork, TravelTimeTable, UndirectedGraph,
};
use crate::{
    algorithm::geo_ops::compute_haversine,
    config::NetworkConfig,
    model::{
        station::{Station, StationCatalog, StationId},
        ResilienceError,
    },
};

/// a trip stop that was matched to a station, with its position in the raw trip
#[derive(Debug, Clone, Copy)]
struct MappedStop<'a> {
    station_id: StationId,
    stop_id: &'a str,
    position: usize,
}

/// full-graph edge while trips are still being walked
#[derive(Debug, Clone)]
struct EdgeDraft {
    lines: BTreeSet<LineId>,
    travel_time: Option<f64>,
    distance: Length,
}

/// builds both graphs and the D&K topology from the station catalog and the stop
/// sequences of every route.
///
/// routes sharing a line name are merged into one line; line ids follow line name
/// order. a full-graph edge joins every pair of distinct stations that some trip
/// visits consecutively, taking its travel time from the first matching stop pair in
/// `travel_times` or, failing that, from its great-circle length at the configured
/// average speed. the D&K graph joins consecutive special vertices of each trip, and
/// a repair pass links any special vertex left without an edge to the nearest
/// connected special vertex sharing one of its lines.
///
/// # Arguments
///
/// * `catalog` - deduplicated stations
/// * `routes` - per-route trip stop sequences
/// * `travel_times` - averaged travel times between raw stops
/// * `config` - network parameters
///
/// # Returns
///
/// The canonical network, or an error if the catalog is empty or a route is unnamed.
pub fn build_topology(
    catalog: &StationCatalog,
    routes: &[RouteSequence],
    travel_times: &TravelTimeTable,
    config: &NetworkConfig,
) -> Result<TransitNetwork, ResilienceError> {
    config.validate()?;
    if catalog.is_empty() {
        return Err(ResilienceError::EmptyNetwork);
    }
    let mut by_name: BTreeMap<&str, Vec<&RouteSequence>> = BTreeMap::new();
    for route in routes.iter() {
        if route.line_name.trim().is_empty() {
            return Err(ResilienceError::InvalidRouteData(String::from(
                "route sequence has an empty line name",
            )));
        }
        by_name.entry(route.line_name.as_str()).or_default().push(route);
    }

    // map every trip onto stations
    let mut anomalies: Vec<TopologyAnomaly> = vec![];
    let mut lines: Vec<Line> = Vec::with_capacity(by_name.len());
    let mut line_trips: Vec<Vec<Vec<MappedStop>>> = Vec::with_capacity(by_name.len());
    for (idx, (name, sequences)) in by_name.into_iter().enumerate() {
        let (line, trips, unmapped) = map_line(LineId(idx), name, &sequences, catalog);
        if unmapped > 0 {
            log::warn!("line '{name}' references {unmapped} stops missing from the catalog");
            anomalies.push(TopologyAnomaly::UnmappedStops {
                line_name: name.to_string(),
                count: unmapped,
            });
        }
        if line.stations.is_empty() {
            log::warn!("line '{name}' serves no known station");
            anomalies.push(TopologyAnomaly::EmptyLine {
                line_name: name.to_string(),
            });
        }
        lines.push(line);
        line_trips.push(trips);
    }
    log::info!(
        "merged {} route sequences into {} lines: {}",
        routes.len(),
        lines.len(),
        lines.iter().map(|l| &l.name).join(", ")
    );

    let full_graph = build_full_graph(catalog, &lines, &line_trips, travel_times, config)?;

    // classify
    let mut station_lines: BTreeMap<StationId, BTreeSet<LineId>> = BTreeMap::new();
    for line in lines.iter() {
        for station_id in line.stations.iter() {
            station_lines.entry(*station_id).or_default().insert(line.id);
        }
    }
    let transfer: BTreeSet<StationId> = station_lines
        .iter()
        .filter(|(_, l)| l.len() >= 2)
        .map(|(s, _)| *s)
        .collect();
    let terminal = terminal_stations(&full_graph, &lines);
    let special: BTreeSet<StationId> = transfer.union(&terminal).copied().collect();
    log::info!(
        "identified {} transfer and {} terminal stations, {} special vertices",
        transfer.len(),
        terminal.len(),
        special.len()
    );

    let mut special_graph =
        build_special_graph(&special, &lines, &line_trips, travel_times)?;
    let isolated = repair_isolated_vertices(&mut special_graph, &special, &station_lines, catalog)?;
    for station_id in isolated.into_iter() {
        log::warn!(
            "special vertex {} ({}) has no D&K edge and no connected vertex shares its lines",
            station_id,
            station_label(catalog, &station_id)
        );
        anomalies.push(TopologyAnomaly::IsolatedSpecialVertex { station_id });
    }

    let mut line_lengths: BTreeMap<LineId, Length> = lines
        .iter()
        .map(|l| (l.id, Length::new::<meter>(0.0)))
        .collect();
    line_lengths.extend(route_lengths(&full_graph));
    let total_length = line_lengths
        .values()
        .fold(Length::new::<meter>(0.0), |acc, l| acc + *l);
    for line in lines.iter_mut() {
        if let Some(length) = line_lengths.get(&line.id) {
            line.length = *length;
        }
    }

    let topology = Topology {
        single_use_edges: special_graph.n_edges(),
        multiple_use_edges: special_graph
            .edges()
            .filter(|(_, e)| e.is_multiple_use())
            .count(),
        transfer,
        terminal,
        special,
        station_lines,
        line_lengths,
        total_length,
        n_lines: lines.len(),
        anomalies,
    };
    log::info!(
        "D&K topology: {} single-use and {} multiple-use edges, total route length {:.2} km",
        topology.single_use_edges,
        topology.multiple_use_edges,
        topology.total_length.get::<kilometer>()
    );

    let stations = classified_stations(catalog, &topology);
    Ok(TransitNetwork {
        stations,
        lines,
        topology,
        full_graph,
        special_graph,
    })
}

/// great-circle length of the full-graph edges each line runs on
pub fn route_lengths(full_graph: &FullGraph) -> BTreeMap<LineId, Length> {
    let mut lengths: BTreeMap<LineId, Length> = BTreeMap::new();
    for (_, edge) in full_graph.edges() {
        for line_id in edge.lines.iter() {
            let length = lengths
                .entry(*line_id)
                .or_insert(Length::new::<meter>(0.0));
            *length += edge.distance;
        }
    }
    lengths
}

/// merges the trips of one line and maps their stops onto stations. returns the
/// line, its mapped trips and the number of stops missing from the catalog.
fn map_line<'a>(
    line_id: LineId,
    name: &str,
    sequences: &[&'a RouteSequence],
    catalog: &StationCatalog,
) -> (Line, Vec<Vec<MappedStop<'a>>>, usize) {
    let mut line = Line::new(line_id, name);
    let mut trips: Vec<Vec<MappedStop<'a>>> = vec![];
    let mut unmapped = 0;
    for trip in sequences.iter().copied().flat_map(|r| r.trips.iter()) {
        let mut mapped: Vec<MappedStop<'a>> = Vec::with_capacity(trip.len());
        for (position, stop_id) in trip.iter().enumerate() {
            match catalog.station_for_stop(stop_id) {
                Some(station_id) => mapped.push(MappedStop {
                    station_id,
                    stop_id: stop_id.as_str(),
                    position,
                }),
                None => unmapped += 1,
            }
        }
        let station_sequence = mapped.iter().map(|m| m.station_id).dedup().collect_vec();
        if !station_sequence.is_empty() {
            line.stations.extend(station_sequence.iter().copied());
            line.trips.push(station_sequence);
        }
        trips.push(mapped);
    }
    (line, trips, unmapped)
}

fn build_full_graph(
    catalog: &StationCatalog,
    lines: &[Line],
    line_trips: &[Vec<Vec<MappedStop>>],
    travel_times: &TravelTimeTable,
    config: &NetworkConfig,
) -> Result<FullGraph, ResilienceError> {
    let mut drafts: UndirectedGraph<EdgeDraft> = UndirectedGraph::empty();
    for station in catalog.stations() {
        drafts.add_node(station.id);
    }
    let iter = tqdm!(
        lines.iter().zip(line_trips.iter()),
        desc = "build stop-level graph",
        total = lines.len()
    );
    for (line, trips) in iter {
        for trip in trips.iter() {
            for (prev, curr) in trip.iter().tuple_windows() {
                if prev.station_id == curr.station_id {
                    continue;
                }
                let distance = station_distance(catalog, &prev.station_id, &curr.station_id)?;
                let draft = drafts.upsert_edge(prev.station_id, curr.station_id, || EdgeDraft {
                    lines: BTreeSet::new(),
                    travel_time: None,
                    distance,
                })?;
                draft.lines.insert(line.id);
                // set once, from the first trip that has an observation
                if draft.travel_time.is_none() {
                    draft.travel_time = travel_times.get(prev.stop_id, curr.stop_id);
                }
            }
        }
    }
    eprintln!();

    let mut n_estimated = 0;
    let full_graph = drafts.map_edges(|_, draft| {
        let (travel_time_minutes, travel_time_estimated) = match draft.travel_time {
            Some(t) => (t, false),
            None => {
                n_estimated += 1;
                (
                    config.estimate_minutes(draft.distance.get::<kilometer>()),
                    true,
                )
            }
        };
        FullEdge {
            lines: draft.lines,
            travel_time_minutes,
            travel_time_estimated,
            distance: draft.distance,
        }
    });
    log::info!(
        "stop-level graph has {} stations and {} edges",
        full_graph.n_nodes(),
        full_graph.n_edges()
    );
    if n_estimated > 0 {
        log::warn!(
            "{n_estimated} edges have no scheduled travel time, estimated at {} km/h",
            config.average_speed_kmh
        );
    }
    Ok(full_graph)
}

/// stations with degree 1 on the edges of at least one line
fn terminal_stations(full_graph: &FullGraph, lines: &[Line]) -> BTreeSet<StationId> {
    let mut terminal: BTreeSet<StationId> = BTreeSet::new();
    for line in lines.iter() {
        let mut line_degree: BTreeMap<StationId, usize> = BTreeMap::new();
        for (key, _) in full_graph
            .edges()
            .filter(|(_, e)| e.lines.contains(&line.id))
        {
            *line_degree.entry(key.src()).or_default() += 1;
            *line_degree.entry(key.dst()).or_default() += 1;
        }
        terminal.extend(
            line_degree
                .into_iter()
                .filter(|(_, degree)| *degree == 1)
                .map(|(s, _)| s),
        );
    }
    terminal
}

fn build_special_graph(
    special: &BTreeSet<StationId>,
    lines: &[Line],
    line_trips: &[Vec<Vec<MappedStop>>],
    travel_times: &TravelTimeTable,
) -> Result<SpecialGraph, ResilienceError> {
    let mut special_graph = SpecialGraph::empty();
    for station_id in special.iter() {
        special_graph.add_node(*station_id);
    }
    for (line, trips) in lines.iter().zip(line_trips.iter()) {
        for trip in trips.iter() {
            let collapsed = trip
                .iter()
                .filter(|m| special.contains(&m.station_id))
                .dedup_by(|a, b| a.station_id == b.station_id)
                .collect_vec();
            for (a, b) in collapsed.into_iter().tuple_windows() {
                let edge =
                    special_graph.upsert_edge(a.station_id, b.station_id, SpecialEdge::default)?;
                edge.lines.insert(line.id);
                // only a direct hop has a scheduled time; collapsed runs stay unset
                if edge.travel_time_minutes.is_none() && b.position == a.position + 1 {
                    edge.travel_time_minutes = travel_times.get(a.stop_id, b.stop_id);
                }
            }
        }
    }
    Ok(special_graph)
}

/// connects each special vertex that has no D&K edge to the nearest special vertex
/// that has one and shares a line with it (ties go to the lowest station id). vertices
/// repaired earlier count as connected for later ones. returns the vertices that
/// could not be repaired.
fn repair_isolated_vertices(
    special_graph: &mut SpecialGraph,
    special: &BTreeSet<StationId>,
    station_lines: &BTreeMap<StationId, BTreeSet<LineId>>,
    catalog: &StationCatalog,
) -> Result<Vec<StationId>, ResilienceError> {
    let mut unrepaired: Vec<StationId> = vec![];
    let empty = BTreeSet::new();
    for vertex in special.iter() {
        if special_graph.degree(vertex) > 0 {
            continue;
        }
        let vertex_lines = station_lines.get(vertex).unwrap_or(&empty);
        let mut best: Option<(OrderedFloat<f64>, StationId, LineId)> = None;
        for candidate in special.iter() {
            if candidate == vertex || special_graph.degree(candidate) == 0 {
                continue;
            }
            let shared = station_lines
                .get(candidate)
                .and_then(|l| l.intersection(vertex_lines).next().copied());
            if let Some(line_id) = shared {
                let meters = station_distance(catalog, vertex, candidate)?.get::<meter>();
                let entry = (OrderedFloat(meters), *candidate, line_id);
                if best.map_or(true, |b| entry < b) {
                    best = Some(entry);
                }
            }
        }
        match best {
            Some((meters, target, line_id)) => {
                let edge = special_graph.upsert_edge(*vertex, target, SpecialEdge::default)?;
                edge.lines.insert(line_id);
                edge.repaired = true;
                log::info!(
                    "connected isolated special vertex {} to {} via {} ({:.0} m)",
                    station_label(catalog, vertex),
                    station_label(catalog, &target),
                    line_id,
                    meters.0
                );
            }
            None => unrepaired.push(*vertex),
        }
    }
    Ok(unrepaired)
}

fn station_distance(
    catalog: &StationCatalog,
    a: &StationId,
    b: &StationId,
) -> Result<Length, ResilienceError> {
    let src = catalog
        .get(a)
        .ok_or(ResilienceError::GraphMissingStation(*a))?;
    let dst = catalog
        .get(b)
        .ok_or(ResilienceError::GraphMissingStation(*b))?;
    Ok(compute_haversine(src.point, dst.point))
}

fn station_label(catalog: &StationCatalog, station_id: &StationId) -> String {
    catalog
        .get(station_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| station_id.to_string())
}

/// copies of the catalog stations carrying their lines and vertex classes
fn classified_stations(catalog: &StationCatalog, topology: &Topology) -> Vec<Station> {
    catalog
        .stations()
        .iter()
        .map(|s| {
            let mut station = s.clone();
            station.lines = topology
                .station_lines
                .get(&s.id)
                .cloned()
                .unwrap_or_default();
            station.is_transfer = topology.transfer.contains(&s.id);
            station.is_terminal = topology.terminal.contains(&s.id);
            station
        })
        .collect()
}
