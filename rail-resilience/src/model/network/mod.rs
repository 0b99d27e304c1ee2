mod full_edge;
mod line;
mod line_id;
mod special_edge;
mod topology;
mod topology_anomaly;
mod topology_ops;
mod transit_network;
mod travel_time_table;
mod undirected_graph;

pub use full_edge::FullEdge;
pub use line::{Line, RouteSequence};
pub use line_id::LineId;
pub use special_edge::SpecialEdge;
pub use topology::Topology;
pub use topology_anomaly::TopologyAnomaly;
pub use topology_ops::{build_topology, route_lengths};
pub use transit_network::{station_names, TransitNetwork};
pub use travel_time_table::{StopTimeRecord, TravelTimeObservation, TravelTimeTable};
pub use undirected_graph::{EdgeKey, UndirectedGraph};

/// stop-level graph over every logical station
pub type FullGraph = UndirectedGraph<FullEdge>;

/// D&K graph over transfer and terminal stations only
pub type SpecialGraph = UndirectedGraph<SpecialEdge>;
