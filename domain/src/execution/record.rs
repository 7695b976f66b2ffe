//! Execution record state machine.
//!
//! One [`ExecutionRecord`] is created per invocation when the orchestrator
//! begins processing it, and finalized exactly once.
//!
//! # State Transitions
//!
//! ```text
//! Pending ──> InProgress ──> Completed
//!                       ├──> FailedRetryable
//!                       └──> FailedPermanent
//! ```
//!
//! Transition methods are no-ops when called from the wrong state, so a
//! finalized record cannot be overwritten.

use super::fault::{FaultClass, InvocationFault};
use crate::invocation::{InvocationId, InvocationRequest, InvocationState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of one invocation's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    FailedRetryable,
    FailedPermanent,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Pending => "PENDING",
            ExecutionStatus::InProgress => "IN_PROGRESS",
            ExecutionStatus::Completed => "COMPLETED",
            ExecutionStatus::FailedRetryable => "FAILED_RETRYABLE",
            ExecutionStatus::FailedPermanent => "FAILED_PERMANENT",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed
                | ExecutionStatus::FailedRetryable
                | ExecutionStatus::FailedPermanent
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::FailedRetryable | ExecutionStatus::FailedPermanent
        )
    }

    /// Terminal failure status for a fault.
    pub fn from_fault(fault: &InvocationFault) -> Self {
        match fault.classify() {
            FaultClass::Retryable => ExecutionStatus::FailedRetryable,
            FaultClass::Permanent => ExecutionStatus::FailedPermanent,
        }
    }

    /// Coarse request state this status projects onto.
    pub fn invocation_state(&self) -> InvocationState {
        match self {
            ExecutionStatus::Completed => InvocationState::Completed,
            ExecutionStatus::FailedRetryable | ExecutionStatus::FailedPermanent => {
                InvocationState::Failed
            }
            ExecutionStatus::Pending | ExecutionStatus::InProgress => InvocationState::Pending,
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Invocation this record belongs to
    pub invocation_id: InvocationId,
    /// Tool that was invoked
    pub tool_name: String,
    /// Current status
    pub status: ExecutionStatus,
    /// Parameters used for the call
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Result payload (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error message (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in milliseconds (0 until finalized)
    pub duration_ms: u64,
    /// Number of dispatch attempts beyond the first
    pub retries: u32,
}

impl ExecutionRecord {
    /// Create a pending record from a request, snapshotting its parameters.
    pub fn new(request: &InvocationRequest) -> Self {
        Self {
            invocation_id: request.id.clone(),
            tool_name: request.tool_name.clone(),
            status: ExecutionStatus::Pending,
            parameters: request.parameters.clone(),
            result: None,
            error: None,
            started_at: None,
            ended_at: None,
            duration_ms: 0,
            retries: 0,
        }
    }

    /// Transition from Pending to InProgress.
    ///
    /// No-op if already past Pending.
    pub fn mark_in_progress(&mut self) {
        if self.status == ExecutionStatus::Pending {
            self.status = ExecutionStatus::InProgress;
            self.started_at = Some(Utc::now());
        }
    }

    /// Transition from InProgress to Completed.
    ///
    /// No-op if not in InProgress state.
    pub fn mark_completed(&mut self, result: serde_json::Value) {
        if self.status == ExecutionStatus::InProgress {
            self.result = Some(result);
            self.finish(ExecutionStatus::Completed);
        }
    }

    /// Transition from InProgress to the failure status matching `fault`.
    ///
    /// No-op if not in InProgress state.
    pub fn mark_failed(&mut self, fault: &InvocationFault) {
        self.mark_failed_with(ExecutionStatus::from_fault(fault), fault.to_string());
    }

    /// Transition from InProgress to an explicit failure status.
    ///
    /// No-op if not in InProgress state or if `status` is not a failure.
    pub fn mark_failed_with(&mut self, status: ExecutionStatus, message: impl Into<String>) {
        if self.status == ExecutionStatus::InProgress && status.is_failure() {
            self.error = Some(message.into());
            self.finish(status);
        }
    }

    fn finish(&mut self, status: ExecutionStatus) {
        let ended_at = Utc::now();
        let started_at = *self.started_at.get_or_insert(ended_at);
        self.duration_ms = (ended_at - started_at).num_milliseconds().max(0) as u64;
        self.ended_at = Some(ended_at);
        self.status = status;
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_completed(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}
