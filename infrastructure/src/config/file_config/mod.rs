//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application types
//! on demand.

mod dispatch;
mod retry;
mod tools;

pub use dispatch::FileDispatchConfig;
pub use retry::FileRetryConfig;
pub use tools::{FileParameterConfig, FileToolConfig};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use toolflow_application::RetryPolicy;
use toolflow_domain::ToolCatalog;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("tool name cannot be empty")]
    EmptyToolName,

    #[error("tool '{0}' is defined more than once")]
    DuplicateTool(String),

    #[error("tool '{0}': timeout_ms cannot be 0")]
    ZeroTimeout(String),

    #[error("tool '{tool}': unknown HTTP method '{method}'")]
    UnknownMethod { tool: String, method: String },

    #[error("retry.max_attempts cannot be 0")]
    ZeroAttempts,

    #[error("retry.multiplier must be at least 1.0 (got {0})")]
    InvalidMultiplier(f64),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Retry and backoff settings
    pub retry: FileRetryConfig,
    /// HTTP transport settings
    pub dispatch: FileDispatchConfig,
    /// Registered tools
    pub tools: Vec<FileToolConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.retry.max_attempts == 0 {
            issues.push(ConfigValidationError::ZeroAttempts);
        }
        if self.retry.multiplier.is_nan() || self.retry.multiplier < 1.0 {
            issues.push(ConfigValidationError::InvalidMultiplier(self.retry.multiplier));
        }

        let mut seen = HashSet::new();
        for tool in &self.tools {
            if let Err(issue) = tool.to_descriptor() {
                issues.push(issue);
                continue;
            }
            let name = tool.name.trim();
            if !seen.insert(name) {
                issues.push(ConfigValidationError::DuplicateTool(name.to_string()));
            }
        }

        issues
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.to_retry_policy()
    }

    /// Build the tool catalog, failing on the first invalid entry.
    pub fn build_catalog(&self) -> Result<ToolCatalog, ConfigValidationError> {
        let mut catalog = ToolCatalog::new();
        for tool in &self.tools {
            let descriptor = tool.to_descriptor()?;
            if catalog.contains(&descriptor.name) {
                return Err(ConfigValidationError::DuplicateTool(descriptor.name));
            }
            catalog = catalog.register(descriptor);
        }
        Ok(catalog)
    }
}
