//! Metrics sink adapters
//!
//! - [`TracingMetricsSink`]: structured tracing events
//! - [`InMemoryMetrics`]: in-process counters and timers

mod in_memory;
mod tracing_sink;

pub use in_memory::{InMemoryMetrics, MetricsSnapshot, TimerStats};
pub use tracing_sink::TracingMetricsSink;
