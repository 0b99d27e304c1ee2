use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// dense index of a logical station in the [`super::StationCatalog`] arena.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct StationId(pub usize);

impl Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
