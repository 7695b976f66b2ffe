//! Application layer for toolflow
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RetryPolicy;
pub use ports::{
    execution_progress::{ExecutionProgressNotifier, NoExecutionProgress},
    metrics_sink::{MetricsSink, NoMetrics},
    tool_dispatcher::{DispatchRequest, ToolDispatcher},
};
pub use use_cases::execute_batch::{BatchOutcome, ExecuteBatchUseCase};
pub use use_cases::run_batch::{BatchReport, RunBatchError, RunBatchUseCase};
