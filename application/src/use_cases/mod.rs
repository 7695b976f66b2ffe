//! Use cases
//!
//! Application-level operations that orchestrate domain logic.
//!
//! - [`execute_batch`]: sequential, timeout-bounded execution of an ordered batch
//! - [`run_batch`]: validate, resolve, execute and project feedback

pub mod execute_batch;
pub mod run_batch;
pub(crate) mod shared;
