//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: batch-level errors (unknown tool, cycle, missing dependencies)

pub mod error;
