//! Output formatter trait

use roundtrip_domain::FleetReport;

/// Trait for formatting the final run report
pub trait ReportFormatter {
    /// Format the report for human consumption
    fn format(&self, report: &FleetReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &FleetReport) -> String;
}
