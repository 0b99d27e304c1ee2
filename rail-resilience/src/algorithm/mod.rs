mod betweenness;
pub mod connected_components;
pub mod geo_ops;
mod line_change_search;
mod search;
mod time_bounded_search;

pub use betweenness::betweenness_centrality;
pub use line_change_search::{
    line_change_diameter, line_changes_from, min_line_changes, LineChangeDiameter,
};
pub use search::bfs_undirected;
pub use time_bounded_search::travel_times_from;
