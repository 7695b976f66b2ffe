//! Retry configuration from TOML (`[retry]` section)
//!
//! ```toml
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 1000
//! multiplier = 2.0
//! max_delay_ms = 30000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolflow_application::RetryPolicy;

/// Raw retry configuration (durations in milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per invocation, including the first
    pub max_attempts: u32,
    /// Wait before the second attempt
    pub initial_delay_ms: u64,
    /// Growth factor for each subsequent wait
    pub multiplier: f64,
    /// Cap for a single wait
    pub max_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            multiplier: policy.multiplier,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl FileRetryConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_multiplier(self.multiplier)
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}
