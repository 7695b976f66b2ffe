//! Retry policy for tool dispatch.
//!
//! [`RetryPolicy`] is handed to the orchestrator at construction time. It
//! decides how many attempts a retryable fault gets and how long to wait
//! between them.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolflow_domain::InvocationFault;

/// Exponential backoff parameters.
///
/// | Field | Default |
/// |-------|---------|
/// | `max_attempts` | 3 |
/// | `initial_delay` | 1s |
/// | `multiplier` | 2.0 |
/// | `max_delay` | 30s |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per invocation, including the first one.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Growth factor applied to each subsequent wait.
    pub multiplier: f64,
    /// Upper bound for a single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    // ==================== Queries ====================

    /// Effective attempt ceiling. Never below one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the given failed attempt (1-based).
    ///
    /// `initial_delay * multiplier^(attempt - 1)`, capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        let millis = self.initial_delay.as_millis() as f64 * factor;
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Whether a fault on `attempt` (1-based) earns another attempt.
    pub fn should_retry(&self, fault: &InvocationFault, attempt: u32) -> bool {
        fault.is_retryable() && attempt < self.attempts()
    }
}
