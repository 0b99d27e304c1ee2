use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// dense index of a service line in [`super::TransitNetwork::lines`].
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct LineId(pub usize);

impl Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}
