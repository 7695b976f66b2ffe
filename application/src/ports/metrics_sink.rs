//! Metrics sink port
//!
//! Fire-and-forget counters and timers emitted by the orchestrator.

use std::time::Duration;
use toolflow_domain::{ExecutionStatus, ExecutionSummary};

/// Receives execution metrics.
///
/// Methods are infallible: a sink that cannot record must drop the sample
/// rather than disturb execution.
pub trait MetricsSink: Send + Sync {
    /// One invocation reached a terminal status.
    fn record_invocation(&self, tool_name: &str, status: ExecutionStatus, duration: Duration);

    /// A batch finished.
    fn record_batch(&self, summary: &ExecutionSummary, elapsed: Duration);
}

/// Sink that discards everything
pub struct NoMetrics;

impl MetricsSink for NoMetrics {
    fn record_invocation(&self, _tool_name: &str, _status: ExecutionStatus, _duration: Duration) {}
    fn record_batch(&self, _summary: &ExecutionSummary, _elapsed: Duration) {}
}
