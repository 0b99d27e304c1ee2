mod analysis_ops;
mod analysis_report;

pub use analysis_ops::run_analysis;
pub use analysis_report::AnalysisReport;
