//! Console output formatter for run reports

use crate::output::formatter::ReportFormatter;
use colored::Colorize;
use roundtrip_domain::{AgentReport, AgentStatus, FleetReport};

/// Formats run reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run report
    pub fn format(report: &FleetReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Run Summary"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}    {} {}    {} {}\n\n",
            "Agents:".cyan().bold(),
            report.agents.len(),
            "Completed:".cyan().bold(),
            report.total_completed(),
            "Failed:".cyan().bold(),
            report.total_failed(),
        ));

        for agent in &report.agents {
            output.push_str(&Self::agent_row(agent));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &FleetReport) -> String {
        let envelope = serde_json::json!({
            "totals": {
                "completed": report.total_completed(),
                "failed": report.total_failed(),
            },
            "agents": report.agents,
        });
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_string())
    }

    fn agent_row(agent: &AgentReport) -> String {
        let status = Self::colored_status(agent.status);
        format!(
            "  agent {:<3} {:<20} {} completed, {} failed\n",
            agent.id, status, agent.tally.completed, agent.tally.failed,
        )
    }

    fn colored_status(status: AgentStatus) -> String {
        let text = status.as_str();
        match status {
            AgentStatus::Stopped => text.green().to_string(),
            AgentStatus::Aborted => text.yellow().to_string(),
            _ => text.red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &FleetReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &FleetReport) -> String {
        Self::format_json(report)
    }
}
