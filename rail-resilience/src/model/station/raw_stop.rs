use serde::{Deserialize, Serialize};

/// a stop record as it appears in the schedule feed, before platforms and
/// entrances are merged into logical stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStop {
    pub stop_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// parent station reference, if the feed groups this stop under one
    #[serde(default)]
    pub parent_station: Option<String>,
}

impl RawStop {
    pub fn new(stop_id: &str, name: &str, lat: f64, lon: f64) -> RawStop {
        RawStop {
            stop_id: stop_id.to_string(),
            name: name.to_string(),
            lat,
            lon,
            parent_station: None,
        }
    }

    pub fn with_parent(mut self, parent_station: &str) -> RawStop {
        self.parent_station = Some(parent_station.to_string());
        self
    }

    /// the parent reference, ignoring blank values
    pub fn parent(&self) -> Option<&str> {
        self.parent_station
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
