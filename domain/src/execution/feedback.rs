//! Feedback projection over a finished batch.
//!
//! [`to_feedback`] turns records and their summary into a structure that a
//! response generator can render directly: per-invocation outcomes, one error
//! summary line and remediation hints derived from the error text.

use super::record::{ExecutionRecord, ExecutionStatus};
use super::summary::ExecutionSummary;
use serde::{Deserialize, Serialize};

/// Result or error attached to one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeDetail {
    Result(serde_json::Value),
    Error(String),
}

/// Outcome of one invocation as presented to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub tool_name: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<OutcomeDetail>,
}

/// Feedback artifact for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// True when no invocation failed
    pub complete: bool,
    pub outcomes: Vec<InvocationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Feedback {
    pub fn failed_outcomes(&self) -> impl Iterator<Item = &InvocationOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }
}

/// Project records and summary into a [`Feedback`].
pub fn to_feedback(records: &[ExecutionRecord], summary: &ExecutionSummary) -> Feedback {
    let outcomes = records
        .iter()
        .map(|record| InvocationOutcome {
            tool_name: record.tool_name.clone(),
            status: record.status,
            detail: outcome_detail(record),
        })
        .collect();

    let failures: Vec<&ExecutionRecord> = records.iter().filter(|r| r.is_failure()).collect();

    let error_summary = if failures.is_empty() {
        None
    } else {
        let details = failures
            .iter()
            .map(|r| format!("{}: {}", r.tool_name, r.error.as_deref().unwrap_or("unknown error")))
            .collect::<Vec<_>>()
            .join("; ");
        Some(format!(
            "{} of {} invocations failed: {}",
            summary.failed, summary.total, details
        ))
    };

    let mut suggestions: Vec<String> = Vec::new();
    for record in &failures {
        let suggestion = suggest_remediation(&record.tool_name, record.error.as_deref().unwrap_or(""));
        if !suggestions.contains(&suggestion) {
            suggestions.push(suggestion);
        }
    }

    Feedback {
        complete: summary.failed == 0,
        outcomes,
        error_summary,
        suggestions,
    }
}

fn outcome_detail(record: &ExecutionRecord) -> Option<OutcomeDetail> {
    if let Some(error) = &record.error {
        Some(OutcomeDetail::Error(error.clone()))
    } else {
        record.result.clone().map(OutcomeDetail::Result)
    }
}

/// Derive a remediation hint from an error message.
pub fn suggest_remediation(tool_name: &str, error: &str) -> String {
    if let Some(parameter) = missing_parameter_name(error) {
        format!(
            "Provide a value for '{}' when calling '{}'",
            parameter, tool_name
        )
    } else if error.contains("not found in registry") {
        format!(
            "Tool '{}' does not exist; check the tool name",
            tool_name
        )
    } else if error.contains("timed out") {
        format!("'{}' took too long to respond; retry later", tool_name)
    } else if error.contains("not requested") {
        format!(
            "Include the tools '{}' depends on in the same request",
            tool_name
        )
    } else {
        format!(
            "'{}' could not be completed; review the request and try again",
            tool_name
        )
    }
}

fn missing_parameter_name(error: &str) -> Option<&str> {
    let rest = error.split("Missing required parameter '").nth(1)?;
    rest.split('\'').next().filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::fault::InvocationFault;
    use crate::invocation::InvocationRequest;

    fn completed(tool: &str, result: serde_json::Value) -> ExecutionRecord {
        let mut record = ExecutionRecord::new(&InvocationRequest::new(tool));
        record.mark_in_progress();
        record.mark_completed(result);
        record
    }

    fn failed(tool: &str, fault: InvocationFault) -> ExecutionRecord {
        let mut record = ExecutionRecord::new(&InvocationRequest::new(tool));
        record.mark_in_progress();
        record.mark_failed(&fault);
        record
    }

    #[test]
    fn test_complete_batch() {
        let records = vec![
            completed("search", serde_json::json!(["a", "b"])),
            completed("add_to_order", serde_json::json!({"status": "success"})),
        ];
        let summary = ExecutionSummary::from_records(&records);
        let feedback = to_feedback(&records, &summary);

        assert!(feedback.complete);
        assert_eq!(feedback.outcomes.len(), 2);
        assert!(feedback.error_summary.is_none());
        assert!(feedback.suggestions.is_empty());
        assert_eq!(
            feedback.outcomes[0].detail,
            Some(OutcomeDetail::Result(serde_json::json!(["a", "b"])))
        );
    }

    #[test]
    fn test_failures_produce_summary_and_suggestions() {
        let records = vec![
            completed("search", serde_json::json!([])),
            failed("weather", InvocationFault::missing_parameter("weather", "city")),
            failed("slow", InvocationFault::timeout("slow", 2_000)),
            failed("ghost", InvocationFault::tool_not_found("ghost")),
        ];
        let summary = ExecutionSummary::from_records(&records);
        let feedback = to_feedback(&records, &summary);

        assert!(!feedback.complete);
        assert_eq!(feedback.failed_outcomes().count(), 3);

        let error_summary = feedback.error_summary.unwrap();
        assert!(error_summary.starts_with("3 of 4 invocations failed"));
        assert!(error_summary.contains("weather: Missing required parameter 'city'"));

        assert_eq!(
            feedback.suggestions,
            vec![
                "Provide a value for 'city' when calling 'weather'".to_string(),
                "'slow' took too long to respond; retry later".to_string(),
                "Tool 'ghost' does not exist; check the tool name".to_string(),
            ]
        );
    }

    #[test]
    fn test_generic_suggestion() {
        let suggestion = suggest_remediation("pay", "Tool 'pay' returned HTTP 500: boom");
        assert!(suggestion.contains("review the request"));
    }

    #[test]
    fn test_remote_not_found_is_not_an_unknown_tool() {
        let fault = InvocationFault::remote("lookup_item", 404, "item not found");
        let suggestion = suggest_remediation("lookup_item", &fault.to_string());
        assert!(!suggestion.contains("does not exist"));
        assert!(suggestion.contains("review the request"));

        let unknown = InvocationFault::tool_not_found("ghost");
        assert_eq!(
            suggest_remediation("ghost", &unknown.to_string()),
            "Tool 'ghost' does not exist; check the tool name"
        );
    }

    #[test]
    fn test_duplicate_suggestions_collapse() {
        let records = vec![
            failed("slow", InvocationFault::timeout("slow", 100)),
            failed("slow", InvocationFault::timeout("slow", 100)),
        ];
        let summary = ExecutionSummary::from_records(&records);
        let feedback = to_feedback(&records, &summary);
        assert_eq!(feedback.suggestions.len(), 1);
    }

    #[test]
    fn test_missing_parameter_name_extraction() {
        assert_eq!(
            missing_parameter_name("Missing required parameter 'city' for tool 'weather'"),
            Some("city")
        );
        assert_eq!(missing_parameter_name("something else"), None);
    }
}
