//! Invocation faults and their retry classification.
//!
//! Every way a single invocation can fail is a variant of [`InvocationFault`].
//! [`InvocationFault::classify`] is the only place that decides whether a
//! failure is worth retrying:
//!
//! | Fault | Class |
//! |-------|-------|
//! | `ToolNotFound` | Permanent |
//! | `MissingParameter` | Permanent |
//! | `UnsupportedMethod` | Permanent |
//! | `Remote` 4xx | Permanent |
//! | `Remote` 5xx / other | Retryable |
//! | `Timeout` | Retryable |
//! | `Unexpected` | Retryable |
//! | `Cancelled` | Retryable |

use crate::tool::entities::HttpMethod;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a failure could succeed if attempted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultClass {
    Retryable,
    Permanent,
}

impl FaultClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FaultClass::Retryable)
    }
}

/// Failure of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationFault {
    #[error("Tool '{tool}' not found in registry")]
    ToolNotFound { tool: String },

    #[error("Missing required parameter '{parameter}' for tool '{tool}'")]
    MissingParameter { tool: String, parameter: String },

    #[error("HTTP method {method} is not supported (tool '{tool}')")]
    UnsupportedMethod { tool: String, method: HttpMethod },

    #[error("Tool '{tool}' timed out after {budget_ms}ms")]
    Timeout { tool: String, budget_ms: u64 },

    #[error("Tool '{tool}' returned HTTP {status}: {message}")]
    Remote {
        tool: String,
        status: u16,
        message: String,
    },

    #[error("Tool '{tool}' failed: {message}")]
    Unexpected { tool: String, message: String },

    #[error("Execution of tool '{tool}' was cancelled")]
    Cancelled { tool: String },
}

impl InvocationFault {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn missing_parameter(tool: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            tool: tool.into(),
            parameter: parameter.into(),
        }
    }

    pub fn unsupported_method(tool: impl Into<String>, method: HttpMethod) -> Self {
        Self::UnsupportedMethod {
            tool: tool.into(),
            method,
        }
    }

    pub fn timeout(tool: impl Into<String>, budget_ms: u64) -> Self {
        Self::Timeout {
            tool: tool.into(),
            budget_ms,
        }
    }

    pub fn remote(tool: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            tool: tool.into(),
            status,
            message: message.into(),
        }
    }

    pub fn unexpected(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unexpected {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(tool: impl Into<String>) -> Self {
        Self::Cancelled { tool: tool.into() }
    }

    /// Decide whether this failure is worth retrying.
    pub fn classify(&self) -> FaultClass {
        match self {
            Self::ToolNotFound { .. }
            | Self::MissingParameter { .. }
            | Self::UnsupportedMethod { .. } => FaultClass::Permanent,
            Self::Remote { status, .. } if (400..500).contains(status) => FaultClass::Permanent,
            Self::Remote { .. }
            | Self::Timeout { .. }
            | Self::Unexpected { .. }
            | Self::Cancelled { .. } => FaultClass::Retryable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.classify().is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_side_faults_are_permanent() {
        assert_eq!(
            InvocationFault::tool_not_found("x").classify(),
            FaultClass::Permanent
        );
        assert_eq!(
            InvocationFault::missing_parameter("weather", "city").classify(),
            FaultClass::Permanent
        );
        assert_eq!(
            InvocationFault::unsupported_method("x", HttpMethod::Patch).classify(),
            FaultClass::Permanent
        );
    }

    #[test]
    fn test_remote_status_classification() {
        assert_eq!(
            InvocationFault::remote("x", 400, "bad").classify(),
            FaultClass::Permanent
        );
        assert_eq!(
            InvocationFault::remote("x", 404, "nope").classify(),
            FaultClass::Permanent
        );
        assert_eq!(
            InvocationFault::remote("x", 499, "").classify(),
            FaultClass::Permanent
        );
        assert_eq!(
            InvocationFault::remote("x", 500, "boom").classify(),
            FaultClass::Retryable
        );
        assert_eq!(
            InvocationFault::remote("x", 503, "busy").classify(),
            FaultClass::Retryable
        );
        // Anything outside 4xx is treated as transient
        assert_eq!(
            InvocationFault::remote("x", 302, "moved").classify(),
            FaultClass::Retryable
        );
    }

    #[test]
    fn test_transient_faults_are_retryable() {
        assert!(InvocationFault::timeout("x", 100).is_retryable());
        assert!(InvocationFault::unexpected("x", "connection reset").is_retryable());
        assert!(InvocationFault::cancelled("x").is_retryable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            InvocationFault::timeout("weather", 5000).to_string(),
            "Tool 'weather' timed out after 5000ms"
        );
        assert_eq!(
            InvocationFault::missing_parameter("weather", "city").to_string(),
            "Missing required parameter 'city' for tool 'weather'"
        );
        assert_eq!(
            InvocationFault::unsupported_method("patcher", HttpMethod::Patch).to_string(),
            "HTTP method PATCH is not supported (tool 'patcher')"
        );
    }
}
