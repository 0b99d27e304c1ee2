mod accessibility_ops;
mod area_method;
mod reachability_result;

pub use accessibility_ops::compute_accessibility;
pub use area_method::AreaMethod;
pub use reachability_result::ReachabilityResult;
