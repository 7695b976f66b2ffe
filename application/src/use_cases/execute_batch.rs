//! Execute Batch use case.
//!
//! Runs an already ordered batch one invocation at a time. Every invocation
//! ends in a terminal [`ExecutionRecord`]; single-invocation failures never
//! escape as errors.

use crate::config::RetryPolicy;
use crate::ports::execution_progress::{ExecutionProgressNotifier, NoExecutionProgress};
use crate::ports::metrics_sink::{MetricsSink, NoMetrics};
use crate::ports::tool_dispatcher::{DispatchRequest, ToolDispatcher};
use crate::use_cases::shared::{dispatch_with_retry, is_cancelled};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use toolflow_domain::{
    ExecutionRecord, ExecutionStatus, ExecutionSummary, InvocationFault, InvocationRequest,
    ParameterValidator, RequiredParameterValidator, ToolLookup,
};
use tracing::{debug, info, warn};

/// Records and summary for one executed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<ExecutionRecord>,
    pub summary: ExecutionSummary,
}

/// Use case for executing an ordered batch of invocations.
///
/// Processing is sequential: the next invocation starts only after the
/// previous one has a terminal record. Each dispatch runs as its own task
/// bounded by the tool's timeout budget.
pub struct ExecuteBatchUseCase<D: ToolDispatcher> {
    lookup: Arc<dyn ToolLookup>,
    dispatcher: Arc<D>,
    retry_policy: RetryPolicy,
    metrics: Arc<dyn MetricsSink>,
    progress: Arc<dyn ExecutionProgressNotifier>,
    cancellation_token: Option<CancellationToken>,
}

impl<D: ToolDispatcher + 'static> ExecuteBatchUseCase<D> {
    pub fn new(lookup: Arc<dyn ToolLookup>, dispatcher: Arc<D>, retry_policy: RetryPolicy) -> Self {
        Self {
            lookup,
            dispatcher,
            retry_policy,
            metrics: Arc::new(NoMetrics),
            progress: Arc::new(NoExecutionProgress),
            cancellation_token: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ExecutionProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute `ordered` in sequence.
    ///
    /// Each request's `state` is updated to match its final record.
    pub async fn execute(&self, ordered: &mut [InvocationRequest]) -> BatchOutcome {
        let started = tokio::time::Instant::now();
        let total = ordered.len();
        info!(total, "Executing batch");
        self.progress.on_batch_start(total);

        let mut records = Vec::with_capacity(total);
        for (index, request) in ordered.iter_mut().enumerate() {
            let record = if is_cancelled(&self.cancellation_token) {
                cancelled_record(request)
            } else {
                self.progress.on_invocation_start(request, index, total);
                self.execute_one(request).await
            };

            request.state = record.status.invocation_state();
            self.metrics.record_invocation(
                &record.tool_name,
                record.status,
                Duration::from_millis(record.duration_ms),
            );
            self.progress.on_invocation_complete(&record, index, total);
            records.push(record);
        }

        let summary = ExecutionSummary::from_records(&records);
        info!(
            total = summary.total,
            completed = summary.completed,
            failed = summary.failed,
            "Batch finished"
        );
        self.metrics.record_batch(&summary, started.elapsed());
        self.progress.on_batch_complete(&summary);

        BatchOutcome { records, summary }
    }

    /// Fail every request in `batch` without dispatching.
    ///
    /// Used when a batch-level precondition fails before execution. `message`
    /// produces the error text for each request.
    pub fn reject_batch(
        &self,
        batch: &mut [InvocationRequest],
        message: impl Fn(&InvocationRequest) -> String,
    ) -> BatchOutcome {
        warn!(total = batch.len(), "Rejecting batch");
        let total = batch.len();
        self.progress.on_batch_start(total);

        let mut records = Vec::with_capacity(total);
        for (index, request) in batch.iter_mut().enumerate() {
            let mut record = ExecutionRecord::new(request);
            record.mark_in_progress();
            record.mark_failed_with(ExecutionStatus::FailedPermanent, message(&*request));
            request.state = record.status.invocation_state();
            self.metrics
                .record_invocation(&record.tool_name, record.status, Duration::ZERO);
            self.progress.on_invocation_complete(&record, index, total);
            records.push(record);
        }

        let summary = ExecutionSummary::from_records(&records);
        self.metrics.record_batch(&summary, Duration::ZERO);
        self.progress.on_batch_complete(&summary);

        BatchOutcome { records, summary }
    }

    async fn execute_one(&self, request: &InvocationRequest) -> ExecutionRecord {
        let mut record = ExecutionRecord::new(request);
        record.mark_in_progress();

        let descriptor = match self.lookup.descriptor(&request.tool_name) {
            Some(descriptor) => descriptor,
            None => {
                let fault = InvocationFault::tool_not_found(&request.tool_name);
                warn!(tool = %request.tool_name, invocation = %request.id, "{}", fault);
                record.mark_failed(&fault);
                return record;
            }
        };

        if let Err(fault) = RequiredParameterValidator.validate(request, &descriptor) {
            warn!(tool = %request.tool_name, invocation = %request.id, "{}", fault);
            record.mark_failed(&fault);
            return record;
        }

        if !descriptor.method.is_supported() {
            let fault = InvocationFault::unsupported_method(&descriptor.name, descriptor.method);
            warn!(tool = %request.tool_name, invocation = %request.id, "{}", fault);
            record.mark_failed(&fault);
            return record;
        }

        let call = DispatchRequest::new(&descriptor, request);
        let dispatched = dispatch_with_retry(
            &self.dispatcher,
            request,
            &call,
            descriptor.timeout(),
            &self.retry_policy,
            &self.cancellation_token,
            self.progress.as_ref(),
        )
        .await;

        record.retries = dispatched.attempts.saturating_sub(1);
        match dispatched.result {
            Ok(value) => {
                debug!(
                    tool = %request.tool_name,
                    invocation = %request.id,
                    attempts = dispatched.attempts,
                    "Invocation completed"
                );
                record.mark_completed(value);
            }
            Err(fault) => {
                warn!(
                    tool = %request.tool_name,
                    invocation = %request.id,
                    attempts = dispatched.attempts,
                    class = ?fault.classify(),
                    "Invocation failed: {}",
                    fault
                );
                record.mark_failed(&fault);
            }
        }
        record
    }
}

fn cancelled_record(request: &InvocationRequest) -> ExecutionRecord {
    let mut record = ExecutionRecord::new(request);
    record.mark_in_progress();
    record.mark_failed(&InvocationFault::cancelled(&request.tool_name));
    record
}
