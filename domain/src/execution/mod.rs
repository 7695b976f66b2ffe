//! Execution outcomes.
//!
//! - [`fault`]: per-invocation failures and the retryable/permanent classifier
//! - [`record`]: the per-invocation record state machine
//! - [`summary`]: aggregate statistics over a batch
//! - [`feedback`]: user-facing projection of records and summary

pub mod fault;
pub mod feedback;
pub mod record;
pub mod summary;

pub use fault::{FaultClass, InvocationFault};
pub use feedback::{Feedback, InvocationOutcome, OutcomeDetail, to_feedback};
pub use record::{ExecutionRecord, ExecutionStatus};
pub use summary::ExecutionSummary;
