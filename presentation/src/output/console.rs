//! Console output formatter for batch results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use toolflow_application::BatchReport;
use toolflow_domain::{
    ExecutionStatus, ExecutionSummary, Feedback, InvocationRequest, OutcomeDetail, ToolDescriptor,
};

/// Formats batch results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete batch report
    pub fn format(report: &BatchReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Batch Results"));
        output.push('\n');

        if !report.order.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Order:".cyan().bold(),
                report.order.join(" -> ")
            ));
        }

        output.push_str(&Self::section_header("Invocations"));
        output.push_str(&Self::format_feedback(&report.feedback));

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&Self::format_summary(&report.summary));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &BatchReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Per-invocation outcomes, error summary and suggestions
    pub fn format_feedback(feedback: &Feedback) -> String {
        let mut output = String::new();

        for outcome in &feedback.outcomes {
            let marker = match outcome.status {
                ExecutionStatus::Completed => "v".green(),
                ExecutionStatus::FailedRetryable => "!".yellow(),
                _ => "x".red(),
            };
            output.push_str(&format!(
                "  {} {} {}\n",
                marker,
                outcome.tool_name.bold(),
                format!("[{}]", outcome.status).dimmed()
            ));
            match &outcome.detail {
                Some(OutcomeDetail::Result(value)) => {
                    let rendered = serde_json::to_string(value).unwrap_or_default();
                    output.push_str(&format!("{}\n", Self::indent(&rendered, "      ")));
                }
                Some(OutcomeDetail::Error(error)) => {
                    output.push_str(&format!("      {}\n", error.red()));
                }
                None => {}
            }
        }

        if let Some(error_summary) = &feedback.error_summary {
            output.push_str(&format!("\n{} {}\n", "Errors:".red().bold(), error_summary));
        }

        if !feedback.suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in &feedback.suggestions {
                output.push_str(&format!("  * {}\n", suggestion));
            }
        }

        output
    }

    pub fn format_summary(summary: &ExecutionSummary) -> String {
        let status = if summary.has_errors {
            "with errors".red().bold()
        } else {
            "ok".green().bold()
        };
        format!(
            "  {} of {} completed, {} failed ({})\n  avg {:.1}ms, fastest {}ms, slowest {}ms, total {}ms\n",
            summary.completed,
            summary.total,
            summary.failed,
            status,
            summary.average_duration_ms,
            summary.fastest_duration_ms,
            summary.slowest_duration_ms,
            summary.total_duration_ms
        )
    }

    /// Resolved execution order, one step per line
    pub fn format_order(order: &[InvocationRequest]) -> String {
        if order.is_empty() {
            return "(empty batch)\n".dimmed().to_string();
        }
        let mut output = format!("{}\n", "Execution order:".cyan().bold());
        for (index, request) in order.iter().enumerate() {
            let params = serde_json::to_string(&request.parameters).unwrap_or_default();
            output.push_str(&format!(
                "  {:>2}. {} {}\n",
                index + 1,
                request.tool_name.bold(),
                params.dimmed()
            ));
        }
        output
    }

    /// Registered tools with method, endpoint, timeout and dependencies
    pub fn format_tools(tools: &[&ToolDescriptor]) -> String {
        if tools.is_empty() {
            return "No tools registered. Add [[tools]] entries to toolflow.toml.\n".to_string();
        }
        let mut output = format!("{}\n", "Registered tools:".cyan().bold());
        for tool in tools {
            output.push_str(&format!(
                "  {} {} {} ({}ms)\n",
                tool.name.bold(),
                tool.method.as_str().yellow(),
                tool.endpoint,
                tool.timeout_ms
            ));
            if !tool.description.is_empty() {
                output.push_str(&format!("      {}\n", tool.description.dimmed()));
            }
            if !tool.depends_on.is_empty() {
                output.push_str(&format!("      depends on: {}\n", tool.depends_on.join(", ")));
            }
            let params: Vec<String> = tool
                .parameters
                .iter()
                .map(|p| {
                    if p.required {
                        format!("{}: {}", p.name, p.param_type)
                    } else {
                        format!("{}?: {}", p.name, p.param_type)
                    }
                })
                .collect();
            if !params.is_empty() {
                output.push_str(&format!("      params: {}\n", params.join(", ")));
            }
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &BatchReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &BatchReport) -> String {
        Self::format_json(report)
    }
}
