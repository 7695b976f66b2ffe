//! Domain layer for toolflow
//!
//! This crate contains the entities, value objects and pure algorithms of the
//! tool execution pipeline. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Batch
//!
//! A batch is the ordered list of [`InvocationRequest`]s derived from one user
//! request. The same tool may be requested several times in one batch.
//!
//! ## Resolution
//!
//! Tools declare the tools they depend on. [`resolve_order`] orders a batch so
//! that dependencies run first, breaking ties by batch order, and reports
//! cycles with a concrete path.
//!
//! ## Execution outcome
//!
//! Every invocation ends as an [`ExecutionRecord`]. Records are aggregated into
//! an [`ExecutionSummary`] and projected into [`Feedback`] for the user.

pub mod core;
pub mod dependency;
pub mod execution;
pub mod invocation;
pub mod tool;

// Re-export commonly used types
pub use core::error::DomainError;
pub use dependency::{
    DependencyGraph, MissingDependency, MissingDependencyReport, NodeHandle,
    ToolMissingDependencies, find_missing_dependencies, resolve_order,
};
pub use execution::{
    ExecutionRecord, ExecutionStatus, ExecutionSummary, FaultClass, Feedback, InvocationFault,
    InvocationOutcome, OutcomeDetail, to_feedback,
};
pub use invocation::{InvocationId, InvocationRequest, InvocationState};
pub use tool::{
    HttpMethod, ParameterValidator, RequiredParameterValidator, ToolCatalog, ToolDescriptor,
    ToolLookup, ToolParameter,
};
