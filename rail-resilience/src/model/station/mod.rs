mod raw_stop;
mod station;
mod station_catalog;
mod station_id;

pub use raw_stop::RawStop;
pub use station::Station;
pub use station_catalog::{normalize_station_name, StationCatalog};
pub use station_id::StationId;
