pub mod accessibility;
pub mod analysis;
pub mod indicator;
pub mod network;
mod resilience_error;
pub mod scenario;
pub mod station;

pub use resilience_error::ResilienceError;
