use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex},
};

use geo::Point;
use itertools::Itertools;
use kdam::{tqdm, Bar, BarExt};
use rayon::prelude::*;
use uom::si::{f64::Length, length::kilometer};

use super::{AreaMethod, ReachabilityResult};
use crate::{
    algorithm::{geo_ops, travel_times_from},
    config::AccessibilityConfig,
    model::{
        network::FullGraph,
        station::{Station, StationId},
        ResilienceError,
    },
};

type TravelTimes = BTreeMap<StationId, BTreeMap<StationId, f64>>;

/// computes time-bounded reachability for every configured threshold.
///
/// each threshold runs its own bounded search from every station of the stop-level
/// graph. the reachable area is the convex hull of the stations reachable from the
/// representative station (the one whose reachable count is closest to the average,
/// lowest id on ties), falling back to `average × area_per_station_km2` when the
/// average is 2 or less or the hull is degenerate.
///
/// # Arguments
///
/// * `full_graph` - stop-level graph weighted by travel time in minutes
/// * `stations` - stations with coordinates, matched to graph nodes by id
/// * `total_length` - network route length used to normalize the score
/// * `config` - thresholds, population and fallback area
///
/// # Returns
///
/// One result per threshold, in configured order.
pub fn compute_accessibility(
    full_graph: &FullGraph,
    stations: &[Station],
    total_length: Length,
    config: &AccessibilityConfig,
) -> Result<Vec<ReachabilityResult>, ResilienceError> {
    config.validate()?;
    if full_graph.is_empty() {
        return Err(ResilienceError::EmptyNetwork);
    }
    let length_km = total_length.get::<kilometer>();
    if !(length_km.is_finite() && length_km > 0.0) {
        log::warn!("total route length is {length_km} km, accessibility scores are reported as 0");
    }

    let all_times = search_all(
        full_graph,
        None,
        config.parallelize,
        String::from("travel times"),
    )?;
    let max_travel_time_minutes = all_times
        .values()
        .flat_map(|times| times.values())
        .copied()
        .fold(0.0, f64::max);
    log::info!("longest shortest travel time in network: {max_travel_time_minutes:.1} min");

    config
        .time_thresholds_minutes
        .iter()
        .map(|threshold| {
            let times = search_all(
                full_graph,
                Some(*threshold),
                config.parallelize,
                format!("reachability within {threshold} min"),
            )?;
            let reachable = times
                .into_iter()
                .map(|(src, t)| (src, t.into_keys().collect::<BTreeSet<_>>()))
                .collect::<BTreeMap<_, _>>();
            summarize(
                *threshold,
                reachable,
                max_travel_time_minutes,
                stations,
                length_km,
                config,
            )
        })
        .collect()
}

/// shortest travel times from every station, bounded by `cutoff` when given
fn search_all(
    full_graph: &FullGraph,
    cutoff: Option<f64>,
    parallelize: bool,
    desc: String,
) -> Result<TravelTimes, ResilienceError> {
    let nodes = full_graph.nodes().collect_vec();
    let total = nodes.len();
    let result = if parallelize {
        let bar = Arc::new(Mutex::new(
            Bar::builder()
                .total(total)
                .desc(desc)
                .build()
                .map_err(ResilienceError::InternalError)?,
        ));
        nodes
            .into_par_iter()
            .map(|src| {
                let times = travel_times_from(src, full_graph, cutoff).map(|t| (src, t));
                if let Ok(mut b) = bar.clone().lock() {
                    let _ = b.update(1);
                }
                times
            })
            .collect::<Result<TravelTimes, _>>()
    } else {
        tqdm!(nodes.into_iter(), desc = desc, total = total)
            .map(|src| travel_times_from(src, full_graph, cutoff).map(|t| (src, t)))
            .collect::<Result<TravelTimes, _>>()
    };
    eprintln!();
    result
}

fn summarize(
    threshold_minutes: f64,
    reachable: BTreeMap<StationId, BTreeSet<StationId>>,
    max_travel_time_minutes: f64,
    stations: &[Station],
    length_km: f64,
    config: &AccessibilityConfig,
) -> Result<ReachabilityResult, ResilienceError> {
    let n = reachable.len();
    let counts = reachable.values().map(|r| r.len()).collect_vec();
    let total_reachable: usize = counts.iter().sum();
    let average_reachable = total_reachable as f64 / n as f64;
    let reachability_fraction = total_reachable as f64 / (n * n) as f64;
    let median_reachable = counts
        .iter()
        .copied()
        .sorted()
        .nth(n / 2)
        .unwrap_or(0);

    let representative_station = reachable
        .iter()
        .min_by(|(_, a), (_, b)| {
            let da = (a.len() as f64 - average_reachable).abs();
            let db = (b.len() as f64 - average_reachable).abs();
            da.total_cmp(&db)
        })
        .map(|(id, _)| *id);

    let proxy_area = average_reachable * config.area_per_station_km2;
    let (area_km2, area_method) = match representative_station {
        Some(rep) if average_reachable > 2.0 => {
            let points_by_id: BTreeMap<StationId, Point<f64>> =
                stations.iter().map(|s| (s.id, s.point)).collect();
            let points = reachable
                .get(&rep)
                .into_iter()
                .flatten()
                .map(|id| {
                    points_by_id
                        .get(id)
                        .copied()
                        .ok_or(ResilienceError::GraphMissingStation(*id))
                })
                .collect::<Result<Vec<_>, _>>()?;
            match geo_ops::convex_hull_area_km2(&points) {
                Some(area) => (area, AreaMethod::ConvexHull),
                None => {
                    log::warn!(
                        "convex hull around {} stations reachable from {rep} within {threshold_minutes} min is degenerate, using per-station area",
                        points.len()
                    );
                    (proxy_area, AreaMethod::PerStationProxy)
                }
            }
        }
        _ => (proxy_area, AreaMethod::PerStationProxy),
    };

    let score = if length_km.is_finite() && length_km > 0.0 {
        area_km2 / (length_km / config.population * 1000.0)
    } else {
        0.0
    };

    log::info!(
        "within {threshold_minutes} min: {average_reachable:.1} of {n} stations reachable on average ({:.1}%), median {median_reachable}, area {area_km2:.2} km² ({area_method}), SME {score:.2}",
        reachability_fraction * 100.0
    );
    Ok(ReachabilityResult {
        threshold_minutes,
        reachable,
        average_reachable,
        median_reachable,
        reachability_fraction,
        max_travel_time_minutes,
        representative_station,
        area_km2,
        area_method,
        score,
    })
}
