use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

use super::{route_lengths, FullGraph, LineId, TopologyAnomaly};
use crate::model::station::StationId;

/// the D&K summary of a network: vertex classes, edge counts and route length.
///
/// the baseline topology is built once by [`super::build_topology`]. failure
/// scenarios derive snapshots from it with [`Topology::without_stations`] and never
/// modify it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    /// stations served by two or more lines
    pub transfer: BTreeSet<StationId>,
    /// stations at the end of some line
    pub terminal: BTreeSet<StationId>,
    /// transfer ∪ terminal, the vertices of the D&K graph
    pub special: BTreeSet<StationId>,
    /// lines serving each station that at least one line serves
    pub station_lines: BTreeMap<StationId, BTreeSet<LineId>>,
    /// every D&K edge
    pub single_use_edges: usize,
    /// D&K edges carrying more than one line, also counted in `single_use_edges`
    pub multiple_use_edges: usize,
    pub line_lengths: BTreeMap<LineId, Length>,
    pub total_length: Length,
    pub n_lines: usize,
    pub anomalies: Vec<TopologyAnomaly>,
}

impl Topology {
    /// number of stations served by at least one line
    pub fn n_served(&self) -> usize {
        self.station_lines.len()
    }

    /// terminals that are not also transfers. a station in both sets counts only
    /// as a transfer vertex.
    pub fn terminal_only(&self) -> BTreeSet<StationId> {
        self.terminal.difference(&self.transfer).copied().collect()
    }

    pub fn lines_at(&self, station_id: &StationId) -> usize {
        self.station_lines
            .get(station_id)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /// special vertices left with no D&K edge by construction
    pub fn isolated_special_vertices(&self) -> Vec<StationId> {
        self.anomalies
            .iter()
            .filter_map(|a| match a {
                TopologyAnomaly::IsolatedSpecialVertex { station_id } => Some(*station_id),
                _ => None,
            })
            .collect()
    }

    /// the topology of the network after `failed` stations are removed.
    ///
    /// failed stations are dropped from the transfer, terminal and special sets
    /// without reclassifying the survivors. the station-line map, the edge counts
    /// and the line count keep their baseline values, so σ's station count and e_m
    /// describe the intact network. route lengths are recounted on `full_graph`,
    /// which must already have the failed stations removed.
    pub fn without_stations(
        &self,
        failed: &BTreeSet<StationId>,
        full_graph: &FullGraph,
    ) -> Topology {
        let line_lengths = route_lengths(full_graph);
        let total_length = line_lengths
            .values()
            .fold(Length::new::<meter>(0.0), |acc, l| acc + *l);
        Topology {
            transfer: self.transfer.difference(failed).copied().collect(),
            terminal: self.terminal.difference(failed).copied().collect(),
            special: self.special.difference(failed).copied().collect(),
            station_lines: self.station_lines.clone(),
            single_use_edges: self.single_use_edges,
            multiple_use_edges: self.multiple_use_edges,
            line_lengths,
            total_length,
            n_lines: self.n_lines,
            anomalies: self
                .anomalies
                .iter()
                .filter(|a| match a {
                    TopologyAnomaly::IsolatedSpecialVertex { station_id } => {
                        !failed.contains(station_id)
                    }
                    _ => true,
                })
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::model::network::{build_topology, RouteSequence, TransitNetwork, TravelTimeTable};
    use crate::model::station::{RawStop, StationCatalog};
    use uom::si::length::kilometer;

    /// line 1 runs a-b-c-d, line 2 runs b-c on the same track
    fn shared_segment() -> TransitNetwork {
        let stops = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, s)| RawStop::new(s, &s.to_uppercase(), 0.0, 0.01 * i as f64))
            .collect::<Vec<_>>();
        let catalog = StationCatalog::from_stops(&stops).expect("valid stops");
        let routes = vec![
            RouteSequence::new("1", vec![vec!["a", "b", "c", "d"]]),
            RouteSequence::new("2", vec![vec!["b", "c"]]),
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
    fn test_without_stations_keeps_baseline_counts() {
        let net = shared_segment();
        let baseline = &net.topology;
        assert_eq!(baseline.single_use_edges, 3);
        assert_eq!(baseline.multiple_use_edges, 1);
        assert_eq!(baseline.n_served(), 4);

        let failed = BTreeSet::from([StationId(1)]);
        let full_graph = net.full_graph.without_nodes(&failed);
        let snapshot = baseline.without_stations(&failed, &full_graph);

        assert_eq!(snapshot.single_use_edges, 3);
        assert_eq!(snapshot.multiple_use_edges, 1);
        assert_eq!(snapshot.n_served(), 4);
        assert_eq!(snapshot.n_lines, 2);
        assert_eq!(snapshot.transfer, BTreeSet::from([StationId(2)]));
        assert!(!snapshot.special.contains(&StationId(1)));
        assert!(snapshot.terminal.contains(&StationId(0)));
        // only c-d is left running
        let km = snapshot.total_length.get::<kilometer>();
        assert!((km - 1.112).abs() < 0.01, "found {km}");
    }

    #[test]
    fn test_without_nothing_is_the_baseline() {
        let net = shared_segment();
        let snapshot = net
            .topology
            .without_stations(&BTreeSet::new(), &net.full_graph);
        assert_eq!(snapshot.transfer, net.topology.transfer);
        assert_eq!(snapshot.terminal, net.topology.terminal);
        assert_eq!(snapshot.station_lines, net.topology.station_lines);
        assert_eq!(snapshot.total_length, net.topology.total_length);
    }
}
