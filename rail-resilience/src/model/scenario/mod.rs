mod disruption_scenario;
mod failure_mode;
mod fri_summary;
mod scenario_ops;

pub use disruption_scenario::Scenario;
pub use failure_mode::{FailureMode, FailureType};
pub use fri_summary::{FriSummary, ProbabilitySummary, TargetedSummary};
pub use scenario_ops::{failure_plans, simulate_scenarios, FailurePlan};
