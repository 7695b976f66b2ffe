//! Run Batch use case.
//!
//! The full pipeline for one batch: missing dependency check, resolution,
//! sequential execution and the feedback projection.

use crate::ports::tool_dispatcher::ToolDispatcher;
use crate::use_cases::execute_batch::{BatchOutcome, ExecuteBatchUseCase};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use toolflow_domain::{
    DomainError, ExecutionRecord, ExecutionSummary, Feedback, InvocationRequest,
    MissingDependencyReport, ToolLookup, find_missing_dependencies, resolve_order, to_feedback,
};
use tracing::{info, warn};

/// Errors that abort a batch before any invocation runs
#[derive(Error, Debug)]
pub enum RunBatchError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Everything produced by one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Tool names in execution order (empty if the batch was rejected)
    pub order: Vec<String>,
    pub records: Vec<ExecutionRecord>,
    pub summary: ExecutionSummary,
    pub feedback: Feedback,
    /// Present when the batch was rejected for missing dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_dependencies: Option<MissingDependencyReport>,
}

impl BatchReport {
    pub fn has_errors(&self) -> bool {
        self.summary.has_errors
    }

    pub fn was_rejected(&self) -> bool {
        self.missing_dependencies.is_some()
    }
}

/// Use case for running a batch end to end.
pub struct RunBatchUseCase<D: ToolDispatcher> {
    lookup: Arc<dyn ToolLookup>,
    executor: ExecuteBatchUseCase<D>,
}

impl<D: ToolDispatcher + 'static> RunBatchUseCase<D> {
    pub fn new(lookup: Arc<dyn ToolLookup>, executor: ExecuteBatchUseCase<D>) -> Self {
        Self { lookup, executor }
    }

    /// Resolve the execution order without running anything.
    ///
    /// Missing dependencies are reported as an error here, since there is no
    /// execution to short-circuit.
    pub fn plan(&self, batch: &[InvocationRequest]) -> Result<Vec<InvocationRequest>, RunBatchError> {
        let missing = find_missing_dependencies(batch, self.lookup.as_ref());
        if !missing.is_empty() {
            return Err(DomainError::MissingDependencies(missing).into());
        }
        Ok(resolve_order(batch, self.lookup.as_ref())?)
    }

    /// Run `batch` and build the report.
    ///
    /// A batch with missing dependencies is not an error: every request gets
    /// a permanent failure record and nothing is dispatched. Unknown tools and
    /// cycles abort with [`RunBatchError`].
    pub async fn run(&self, mut batch: Vec<InvocationRequest>) -> Result<BatchReport, RunBatchError> {
        info!(total = batch.len(), "Running batch");

        let missing = find_missing_dependencies(&batch, self.lookup.as_ref());
        if !missing.is_empty() {
            warn!(tools = missing.len(), "Batch has missing dependencies: {}", missing);
            let outcome = self.executor.reject_batch(&mut batch, |request| {
                match missing.for_tool(&request.tool_name) {
                    Some(entry) => entry.message(),
                    None => format!(
                        "Not executed: the batch was rejected ({})",
                        rejected_tools(&missing)
                    ),
                }
            });
            return Ok(Self::report(Vec::new(), outcome, Some(missing)));
        }

        let mut ordered = resolve_order(&batch, self.lookup.as_ref())?;
        let order = ordered.iter().map(|r| r.tool_name.clone()).collect();

        let outcome = self.executor.execute(&mut ordered).await;
        Ok(Self::report(order, outcome, None))
    }

    fn report(
        order: Vec<String>,
        outcome: BatchOutcome,
        missing_dependencies: Option<MissingDependencyReport>,
    ) -> BatchReport {
        let feedback = to_feedback(&outcome.records, &outcome.summary);
        BatchReport {
            order,
            records: outcome.records,
            summary: outcome.summary,
            feedback,
            missing_dependencies,
        }
    }
}

fn rejected_tools(report: &MissingDependencyReport) -> String {
    report
        .entries
        .iter()
        .map(|e| format!("'{}' lacks its dependencies", e.tool_name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::use_cases::execute_batch::tests::{ScriptedDispatcher, shop_catalog};
    use toolflow_domain::{ExecutionStatus, HttpMethod, ToolCatalog, ToolDescriptor};

    fn run_batch(
        catalog: ToolCatalog,
        dispatcher: Arc<ScriptedDispatcher>,
    ) -> RunBatchUseCase<ScriptedDispatcher> {
        let lookup: Arc<dyn ToolLookup> = Arc::new(catalog);
        let executor = ExecuteBatchUseCase::new(Arc::clone(&lookup), dispatcher, RetryPolicy::default());
        RunBatchUseCase::new(lookup, executor)
    }

    #[tokio::test]
    async fn test_end_to_end_search_then_order() {
        let dispatcher = Arc::new(
            ScriptedDispatcher::new()
                .respond("search", Ok(serde_json::json!(["lamp"])))
                .respond("add_to_order", Ok(serde_json::json!({"status": "success"}))),
        );
        let uc = run_batch(shop_catalog(), Arc::clone(&dispatcher));

        let batch = vec![
            InvocationRequest::new("add_to_order"),
            InvocationRequest::new("search").with_param("keyword", "x"),
        ];
        let report = uc.run(batch).await.unwrap();

        assert_eq!(report.order, vec!["search", "add_to_order"]);
        assert_eq!(dispatcher.called_tools(), vec!["search", "add_to_order"]);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.completed, 2);
        assert_eq!(report.summary.failed, 0);
        assert!(!report.summary.has_errors);
        assert!(report.feedback.complete);
        assert!(!report.was_rejected());
    }

    #[tokio::test]
    async fn test_missing_dependency_short_circuits() {
        let dispatcher = Arc::new(ScriptedDispatcher::new());
        let uc = run_batch(shop_catalog(), Arc::clone(&dispatcher));

        let batch = vec![
            InvocationRequest::new("add_to_order"),
            InvocationRequest::new("weather").with_param("city", "Oslo"),
        ];
        let report = uc.run(batch).await.unwrap();

        assert_eq!(dispatcher.call_count(), 0);
        assert!(report.was_rejected());
        assert!(report.order.is_empty());
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.failed, 2);
        assert!(
            report
                .records
                .iter()
                .all(|r| r.status == ExecutionStatus::FailedPermanent)
        );

        let error = report.records[0].error.as_deref().unwrap();
        assert!(error.contains("requires 'search'"));
        assert!(
            report
                .feedback
                .suggestions
                .contains(&"Include the tools 'add_to_order' depends on in the same request".to_string())
        );
    }

    #[tokio::test]
    async fn test_cycle_aborts_before_dispatch() {
        let catalog = ToolCatalog::new()
            .register(ToolDescriptor::new("a", "http://tools/a", HttpMethod::Get).depends_on("b"))
            .register(ToolDescriptor::new("b", "http://tools/b", HttpMethod::Get).depends_on("a"));
        let dispatcher = Arc::new(ScriptedDispatcher::new());
        let uc = run_batch(catalog, Arc::clone(&dispatcher));

        let batch = vec![InvocationRequest::new("a"), InvocationRequest::new("b")];
        let err = uc.run(batch).await.unwrap_err();

        let RunBatchError::Domain(domain) = err;
        let path = domain.cycle_path().unwrap();
        assert!(path.contains('a') && path.contains('b'));
        assert_eq!(dispatcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_aborts_batch() {
        let dispatcher = Arc::new(ScriptedDispatcher::new());
        let uc = run_batch(shop_catalog(), Arc::clone(&dispatcher));

        let batch = vec![InvocationRequest::new("ghost")];
        let err = uc.run(batch).await.unwrap_err();

        assert!(matches!(
            err,
            RunBatchError::Domain(DomainError::ToolNotFound(ref name)) if name == "ghost"
        ));
        assert_eq!(dispatcher.call_count(), 0);
    }

    #[test]
    fn test_plan_reports_missing_dependencies() {
        let uc = run_batch(shop_catalog(), Arc::new(ScriptedDispatcher::new()));

        let err = uc.plan(&[InvocationRequest::new("add_to_order")]).unwrap_err();
        assert!(matches!(
            err,
            RunBatchError::Domain(DomainError::MissingDependencies(_))
        ));

        let order = uc
            .plan(&[
                InvocationRequest::new("add_to_order"),
                InvocationRequest::new("search"),
            ])
            .unwrap();
        let names: Vec<&str> = order.iter().map(|r| r.tool_name.as_str()).collect();
        assert_eq!(names, vec!["search", "add_to_order"]);
    }
}
