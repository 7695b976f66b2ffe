//! Port definitions (interfaces for external adapters)
//!
//! - [`tool_dispatcher`]: one call to a remote tool endpoint
//! - [`metrics_sink`]: counters and timers
//! - [`execution_progress`]: progress callbacks during a batch

pub mod execution_progress;
pub mod metrics_sink;
pub mod tool_dispatcher;

pub use execution_progress::{ExecutionProgressNotifier, NoExecutionProgress};
pub use metrics_sink::{MetricsSink, NoMetrics};
pub use tool_dispatcher::{DispatchRequest, ToolDispatcher};
