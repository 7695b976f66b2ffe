//! In-memory metrics registry.
//!
//! Keeps counters keyed by `(tool, status)` and duration timers per tool.
//! Useful for tests and for printing a run summary.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use toolflow_application::ports::metrics_sink::MetricsSink;
use toolflow_domain::{ExecutionStatus, ExecutionSummary};

/// Aggregated timings for one tool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerStats {
    pub count: u64,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl TimerStats {
    fn observe(&mut self, duration: Duration) {
        if self.count == 0 || duration < self.min {
            self.min = duration;
        }
        if duration > self.max {
            self.max = duration;
        }
        self.count += 1;
        self.total += duration;
    }

    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count as u32
        }
    }
}

/// Point-in-time copy of everything recorded so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub invocations: BTreeMap<(String, ExecutionStatus), u64>,
    pub timers: BTreeMap<String, TimerStats>,
    pub batches: u64,
    pub batches_with_errors: u64,
    pub batch_time: Duration,
}

impl MetricsSnapshot {
    pub fn count(&self, tool_name: &str, status: ExecutionStatus) -> u64 {
        self.invocations
            .get(&(tool_name.to_string(), status))
            .copied()
            .unwrap_or(0)
    }
}

/// Metrics sink that aggregates in memory
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    state: Mutex<MetricsSnapshot>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }
}

impl MetricsSink for InMemoryMetrics {
    fn record_invocation(&self, tool_name: &str, status: ExecutionStatus, duration: Duration) {
        if let Ok(mut state) = self.state.lock() {
            *state
                .invocations
                .entry((tool_name.to_string(), status))
                .or_insert(0) += 1;
            state
                .timers
                .entry(tool_name.to_string())
                .or_default()
                .observe(duration);
        }
    }

    fn record_batch(&self, summary: &ExecutionSummary, elapsed: Duration) {
        if let Ok(mut state) = self.state.lock() {
            state.batches += 1;
            if summary.has_errors {
                state.batches_with_errors += 1;
            }
            state.batch_time += elapsed;
        }
    }
}
