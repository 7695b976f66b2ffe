//! Invocation request entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request-scoped unique identifier of an invocation.
///
/// Generated once at creation and never reused, so two requests for the same
/// tool inside one batch stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(String);

impl InvocationId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse lifecycle of an invocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationState {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl InvocationState {
    pub fn as_str(&self) -> &str {
        match self {
            InvocationState::Pending => "PENDING",
            InvocationState::Completed => "COMPLETED",
            InvocationState::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for InvocationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to run one named tool with a set of parameters.
///
/// Produced by an external intent-detection step. Everything except
/// [`state`](Self::state) is fixed once the request is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Unique id of this request
    #[serde(default = "InvocationId::generate")]
    pub id: InvocationId,
    /// Name of the tool to run
    #[serde(alias = "tool")]
    pub tool_name: String,
    /// Loosely typed parameter values
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Confidence reported by intent detection (provenance only)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Lifecycle state, updated by the orchestrator
    #[serde(default)]
    pub state: InvocationState,
}

fn default_confidence() -> f64 {
    1.0
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            id: InvocationId::generate(),
            tool_name: tool_name.into(),
            parameters: BTreeMap::new(),
            confidence: default_confidence(),
            state: InvocationState::Pending,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Get a parameter that is present and not JSON null.
    pub fn get_param(&self, key: &str) -> Option<&serde_json::Value> {
        self.parameters.get(key).filter(|v| !v.is_null())
    }

    pub fn is_pending(&self) -> bool {
        self.state == InvocationState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = InvocationRequest::new("search");
        let b = InvocationRequest::new("search");
        assert_ne!(a.id, b.id);
        assert_eq!(a.tool_name, b.tool_name);
    }

    #[test]
    fn test_get_param_ignores_null() {
        let request = InvocationRequest::new("weather")
            .with_param("city", "Oslo")
            .with_param("units", serde_json::Value::Null);

        assert_eq!(request.get_param("city"), Some(&serde_json::json!("Oslo")));
        assert!(request.get_param("units").is_none());
        assert!(request.get_param("missing").is_none());
    }

    #[test]
    fn test_deserialize_batch_entry_defaults() {
        let json = r#"{"tool": "search", "parameters": {"keyword": "x", "limit": 5}}"#;
        let request: InvocationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.tool_name, "search");
        assert_eq!(request.parameters.len(), 2);
        assert_eq!(request.confidence, 1.0);
        assert_eq!(request.state, InvocationState::Pending);
        assert!(!request.id.as_str().is_empty());
    }

    #[test]
    fn test_state_serializes_uppercase() {
        let json = serde_json::to_string(&InvocationState::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }
}
