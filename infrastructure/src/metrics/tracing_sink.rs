//! Metrics as structured tracing events.
//!
//! Every sample becomes an `info` event under the `toolflow::metrics` target,
//! so it can be routed or filtered like any other log output
//! (`RUST_LOG=toolflow::metrics=info`).

use std::time::Duration;
use toolflow_application::ports::metrics_sink::MetricsSink;
use toolflow_domain::{ExecutionStatus, ExecutionSummary};
use tracing::info;

/// Metrics sink that emits tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn record_invocation(&self, tool_name: &str, status: ExecutionStatus, duration: Duration) {
        info!(
            target: "toolflow::metrics",
            metric = "tool_invocation",
            tool = tool_name,
            status = status.as_str(),
            duration_ms = duration.as_millis() as u64,
        );
    }

    fn record_batch(&self, summary: &ExecutionSummary, elapsed: Duration) {
        info!(
            target: "toolflow::metrics",
            metric = "batch",
            total = summary.total,
            completed = summary.completed,
            failed = summary.failed,
            has_errors = summary.has_errors,
            success_rate = summary.success_rate(),
            elapsed_ms = elapsed.as_millis() as u64,
        );
    }
}
