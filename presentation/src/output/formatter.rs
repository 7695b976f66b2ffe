//! Output formatter trait

use toolflow_application::BatchReport;

/// Trait for formatting batch reports
pub trait OutputFormatter {
    /// Human-readable report
    fn format(&self, report: &BatchReport) -> String;

    /// Full report as JSON
    fn format_json(&self, report: &BatchReport) -> String;
}
