//! Domain error types

use crate::dependency::validation::MissingDependencyReport;
use thiserror::Error;

/// Batch-level errors raised before any invocation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Tool '{0}' not found in registry")]
    ToolNotFound(String),

    #[error("Circular dependency detected: {path}")]
    CircularDependency { path: String },

    #[error("Missing dependencies: {0}")]
    MissingDependencies(MissingDependencyReport),
}

impl DomainError {
    /// Cycle path for a circular dependency error
    pub fn cycle_path(&self) -> Option<&str> {
        match self {
            DomainError::CircularDependency { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_dependency_display() {
        let error = DomainError::CircularDependency {
            path: "a -> b -> a".to_string(),
        };
        assert_eq!(error.to_string(), "Circular dependency detected: a -> b -> a");
        assert_eq!(error.cycle_path(), Some("a -> b -> a"));
    }

    #[test]
    fn test_tool_not_found_display() {
        let error = DomainError::ToolNotFound("ghost".to_string());
        assert_eq!(error.to_string(), "Tool 'ghost' not found in registry");
        assert!(error.cycle_path().is_none());
    }
}
