//! Application-level configuration.
//!
//! - [`RetryPolicy`]: attempt ceiling and exponential backoff for dispatch

pub mod retry_policy;

pub use retry_policy::RetryPolicy;
