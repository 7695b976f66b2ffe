//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// HTTP-style method a tool endpoint is invoked with.
///
/// Only GET, POST, PUT and DELETE are dispatchable. The remaining methods are
/// parsed so they can be reported, but are rejected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Whether the dispatcher knows how to shape a call for this method.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            HttpMethod::Get | HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete
        )
    }

    /// GET and DELETE carry parameters in the query string.
    pub fn uses_query_parameters(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(format!("Unknown HTTP method: {}", other)),
        }
    }
}

/// Parameter declared by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number", "list")
    pub param_type: String,
    /// Value sent when the request omits the parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            param_type: "string".to_string(),
            default: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Read-only metadata for a remotely invocable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "search")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Endpoint address
    pub endpoint: String,
    /// Method used to call the endpoint
    pub method: HttpMethod,
    /// Timeout budget for a single dispatch, in milliseconds
    pub timeout_ms: u64,
    /// Declared parameters, in declaration order
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Names of tools that must run before this one
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            endpoint: endpoint.into(),
            method,
            timeout_ms: 30_000,
            parameters: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn depends_on(mut self, tool_name: impl Into<String>) -> Self {
        self.depends_on.push(tool_name.into());
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

/// Catalog of registered tools, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDescriptor) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All descriptors sorted by name.
    pub fn all(&self) -> Vec<&ToolDescriptor> {
        let mut tools: Vec<&ToolDescriptor> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }
}
