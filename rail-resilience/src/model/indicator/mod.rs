mod indicator_ops;
mod indicators;

pub use indicator_ops::{compute_indicators, performance_ratio, predict_performance};
pub use indicators::Indicators;
