//! Execution progress port
//!
//! Callbacks fired while a batch runs. Implementations live in the
//! presentation layer (progress bars, plain text).

use std::time::Duration;
use toolflow_domain::{ExecutionRecord, ExecutionSummary, InvocationFault, InvocationRequest};

/// Callback for progress updates during batch execution
pub trait ExecutionProgressNotifier: Send + Sync {
    /// Called once before the first invocation runs
    fn on_batch_start(&self, _total: usize) {}

    /// Called when an invocation is about to be validated and dispatched
    fn on_invocation_start(&self, _request: &InvocationRequest, _index: usize, _total: usize) {}

    /// Called before waiting out the backoff for another attempt
    fn on_retry(&self, _request: &InvocationRequest, _attempt: u32, _fault: &InvocationFault, _delay: Duration) {}

    /// Called when an invocation reaches a terminal status
    fn on_invocation_complete(&self, _record: &ExecutionRecord, _index: usize, _total: usize) {}

    /// Called after the last invocation
    fn on_batch_complete(&self, _summary: &ExecutionSummary) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoExecutionProgress;

impl ExecutionProgressNotifier for NoExecutionProgress {}
