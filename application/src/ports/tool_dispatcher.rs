//! Tool Dispatcher port
//!
//! Defines how the application layer calls a remote tool endpoint.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use toolflow_domain::{HttpMethod, InvocationFault, InvocationRequest, ToolDescriptor};

/// One call to a tool endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRequest {
    pub tool_name: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl DispatchRequest {
    /// Build the call for `request` against `descriptor`.
    ///
    /// Declared parameters with a default that the request leaves out (or
    /// sets to null) are filled in.
    pub fn new(descriptor: &ToolDescriptor, request: &InvocationRequest) -> Self {
        let mut parameters = request.parameters.clone();
        for param in &descriptor.parameters {
            if let Some(default) = &param.default
                && request.get_param(&param.name).is_none()
            {
                parameters.insert(param.name.clone(), default.clone());
            }
        }

        Self {
            tool_name: descriptor.name.clone(),
            endpoint: descriptor.endpoint.clone(),
            method: descriptor.method,
            parameters,
        }
    }
}

/// Port for dispatching tool calls
///
/// Implementations (adapters) live in the infrastructure layer. A dispatcher
/// makes exactly one attempt per call; retries and deadlines belong to the
/// orchestrator. Dropping the returned future must abandon the call.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Invoke the tool and return its decoded response.
    async fn invoke(&self, request: &DispatchRequest) -> Result<serde_json::Value, InvocationFault>;
}
