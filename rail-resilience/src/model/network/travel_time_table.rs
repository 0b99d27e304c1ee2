use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// one observed run between two consecutive stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelTimeObservation {
    pub from_stop: String,
    pub to_stop: String,
    pub minutes: f64,
}

impl TravelTimeObservation {
    pub fn new(from_stop: &str, to_stop: &str, minutes: f64) -> TravelTimeObservation {
        TravelTimeObservation {
            from_stop: from_stop.to_string(),
            to_stop: to_stop.to_string(),
            minutes,
        }
    }
}

/// a pre-parsed stop time row. times are seconds since the start of the service day
/// and may exceed 24h for trips running past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_seconds: Option<u32>,
    pub departure_seconds: Option<u32>,
}

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// average travel time in minutes between pairs of raw stops.
///
/// every accepted observation is recorded in both directions before averaging, so the
/// value for (a, b) always equals the value for (b, a).
#[derive(Debug, Clone, Default)]
pub struct TravelTimeTable {
    averages: HashMap<(String, String), f64>,
}

impl TravelTimeTable {
    pub fn empty() -> TravelTimeTable {
        TravelTimeTable::default()
    }

    /// averages raw observations. observations that are not strictly between zero and
    /// `max_segment_minutes` are discarded as schedule noise.
    pub fn from_observations<'a, I>(observations: I, max_segment_minutes: f64) -> TravelTimeTable
    where
        I: IntoIterator<Item = &'a TravelTimeObservation>,
    {
        let mut samples: HashMap<(String, String), Vec<f64>> = HashMap::new();
        let mut rejected = 0usize;
        for obs in observations {
            if !is_plausible(obs.minutes, max_segment_minutes) {
                rejected += 1;
                continue;
            }
            samples
                .entry((obs.from_stop.clone(), obs.to_stop.clone()))
                .or_default()
                .push(obs.minutes);
            samples
                .entry((obs.to_stop.clone(), obs.from_stop.clone()))
                .or_default()
                .push(obs.minutes);
        }
        if rejected > 0 {
            log::debug!("discarded {rejected} implausible travel time observations");
        }
        let averages = samples
            .into_iter()
            .map(|(pair, times)| {
                let mean = times.iter().sum::<f64>() / times.len() as f64;
                (pair, mean)
            })
            .collect::<HashMap<_, _>>();
        log::info!("computed travel times for {} stop pairs", averages.len());
        TravelTimeTable { averages }
    }

    /// derives observations from stop time rows: for each trip, ordered by stop
    /// sequence, the run from one stop's departure to the next stop's arrival. a next
    /// arrival earlier than the departure is taken to have crossed midnight.
    pub fn from_stop_times(records: &[StopTimeRecord], max_segment_minutes: f64) -> TravelTimeTable {
        let by_trip = records
            .iter()
            .into_group_map_by(|r| r.trip_id.as_str());
        let observations = by_trip
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .flat_map(|(_, mut rows)| {
                rows.sort_by_key(|r| r.stop_sequence);
                rows.iter()
                    .tuple_windows()
                    .filter_map(|(src, dst)| observation_between(src, dst))
                    .collect_vec()
            })
            .collect_vec();
        TravelTimeTable::from_observations(observations.iter(), max_segment_minutes)
    }

    /// average travel time between two stops, in either direction
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.averages
            .get(&(a.to_string(), b.to_string()))
            .or_else(|| self.averages.get(&(b.to_string(), a.to_string())))
            .copied()
    }

    /// number of directed stop pairs with an average
    pub fn len(&self) -> usize {
        self.averages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}

fn is_plausible(minutes: f64, max_segment_minutes: f64) -> bool {
    minutes.is_finite() && minutes > 0.0 && minutes < max_segment_minutes
}

fn observation_between(
    src: &StopTimeRecord,
    dst: &StopTimeRecord,
) -> Option<TravelTimeObservation> {
    // departure at the origin, falling back to arrival; the reverse at the destination
    let depart = src.departure_seconds.or(src.arrival_seconds)? as f64 / 60.0;
    let mut arrive = dst.arrival_seconds.or(dst.departure_seconds)? as f64 / 60.0;
    if arrive < depart {
        arrive += MINUTES_PER_DAY;
    }
    Some(TravelTimeObservation::new(
        &src.stop_id,
        &dst.stop_id,
        arrive - depart,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trip: &str, stop: &str, seq: u32, arr: u32, dep: u32) -> StopTimeRecord {
        StopTimeRecord {
            trip_id: trip.to_string(),
            stop_id: stop.to_string(),
            stop_sequence: seq,
            arrival_seconds: Some(arr),
            departure_seconds: Some(dep),
        }
    }

    #[test]
    fn test_averaging_is_symmetric() {
        let obs = vec![
            TravelTimeObservation::new("A", "B", 2.0),
            TravelTimeObservation::new("B", "A", 4.0),
            TravelTimeObservation::new("B", "C", 3.0),
        ];
        let table = TravelTimeTable::from_observations(obs.iter(), 30.0);
        assert_eq!(table.get("A", "B"), Some(3.0));
        assert_eq!(table.get("B", "A"), Some(3.0));
        assert_eq!(table.get("C", "B"), table.get("B", "C"));
        assert_eq!(table.get("A", "C"), None);
    }

    #[test]
    fn test_implausible_observations_dropped() {
        let obs = vec![
            TravelTimeObservation::new("A", "B", 0.0),
            TravelTimeObservation::new("A", "B", 45.0),
            TravelTimeObservation::new("A", "B", f64::NAN),
            TravelTimeObservation::new("A", "C", 29.5),
        ];
        let table = TravelTimeTable::from_observations(obs.iter(), 30.0);
        assert_eq!(table.get("A", "B"), None);
        assert_eq!(table.get("A", "C"), Some(29.5));
    }

    #[test]
    fn test_stop_times_sorted_and_midnight_crossing() {
        // rows out of sequence order, second leg departs 23:59 and arrives 00:02
        let rows = vec![
            record("t1", "C", 3, 120, 120),
            record("t1", "A", 1, 86_100, 86_100),
            record("t1", "B", 2, 86_280, 86_340),
        ];
        let table = TravelTimeTable::from_stop_times(&rows, 30.0);
        assert_eq!(table.get("A", "B"), Some(3.0));
        let bc = table.get("B", "C").expect("midnight leg kept");
        assert!((bc - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_times_fall_back() {
        let rows = vec![
            StopTimeRecord {
                trip_id: "t".into(),
                stop_id: "A".into(),
                stop_sequence: 0,
                arrival_seconds: Some(0),
                departure_seconds: None,
            },
            StopTimeRecord {
                trip_id: "t".into(),
                stop_id: "B".into(),
                stop_sequence: 1,
                arrival_seconds: None,
                departure_seconds: Some(240),
            },
            StopTimeRecord {
                trip_id: "t".into(),
                stop_id: "C".into(),
                stop_sequence: 2,
                arrival_seconds: None,
                departure_seconds: None,
            },
        ];
        let table = TravelTimeTable::from_stop_times(&rows, 30.0);
        assert_eq!(table.get("A", "B"), Some(4.0));
        assert_eq!(table.get("B", "C"), None);
    }
}
