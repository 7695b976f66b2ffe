//! Dependency resolution for a batch.
//!
//! - [`validation`]: reports declared dependencies absent from the batch
//! - [`graph`]: builds the per-batch graph and orders it topologically

pub mod graph;
pub mod validation;

pub use graph::{DependencyGraph, NodeHandle, resolve_order};
pub use validation::{
    MissingDependency, MissingDependencyReport, ToolMissingDependencies, find_missing_dependencies,
};
