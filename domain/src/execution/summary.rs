//! Aggregate summary over one batch's execution records.

use super::record::ExecutionRecord;
use serde::{Deserialize, Serialize};

/// Derived statistics for a batch.
///
/// Always recomputed from the record list via [`ExecutionSummary::from_records`];
/// duration statistics only consider completed records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Mean duration of completed records (0 if none completed)
    pub average_duration_ms: f64,
    /// Shortest completed duration (0 if none completed)
    pub fastest_duration_ms: u64,
    /// Longest completed duration (0 if none completed)
    pub slowest_duration_ms: u64,
    /// Sum of all record durations
    pub total_duration_ms: u64,
    pub has_errors: bool,
}

impl ExecutionSummary {
    pub fn from_records(records: &[ExecutionRecord]) -> Self {
        let completed: Vec<u64> = records
            .iter()
            .filter(|r| r.is_completed())
            .map(|r| r.duration_ms)
            .collect();
        let failed = records.iter().filter(|r| r.is_failure()).count();

        let average_duration_ms = if completed.is_empty() {
            0.0
        } else {
            completed.iter().sum::<u64>() as f64 / completed.len() as f64
        };

        Self {
            total: records.len(),
            completed: completed.len(),
            failed,
            average_duration_ms,
            fastest_duration_ms: completed.iter().copied().min().unwrap_or(0),
            slowest_duration_ms: completed.iter().copied().max().unwrap_or(0),
            total_duration_ms: records.iter().map(|r| r.duration_ms).sum(),
            has_errors: failed > 0,
        }
    }

    /// Fraction of invocations that completed (1.0 for an empty batch).
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
