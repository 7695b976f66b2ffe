//! Tool definitions from TOML (`[[tools]]` entries)
//!
//! Example configuration:
//!
//! ```toml
//! [[tools]]
//! name = "search"
//! description = "Search the product catalog"
//! endpoint = "https://shop.example/api/search"
//! method = "GET"
//! timeout_ms = 5000
//!
//! [[tools.parameters]]
//! name = "keyword"
//! type = "string"
//!
//! [[tools]]
//! name = "add_to_order"
//! endpoint = "https://shop.example/api/orders"
//! method = "POST"
//! depends_on = ["search"]
//! ```

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use toolflow_domain::{HttpMethod, ToolDescriptor, ToolParameter};

/// Parameter declaration of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileParameterConfig {
    pub name: String,
    /// Whether the parameter must be supplied (default: true)
    #[serde(default = "default_true")]
    pub required: bool,
    /// Parameter type: "string", "number", "integer", "boolean", ...
    #[serde(rename = "type", default = "default_string_type")]
    pub param_type: String,
    /// Value used when the request leaves the parameter out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

fn default_string_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

/// One `[[tools]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileToolConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub endpoint: String,
    /// HTTP method name (default: "GET")
    #[serde(default = "default_method")]
    pub method: String,
    /// Per-dispatch deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Names of tools that must run first
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<FileParameterConfig>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl FileToolConfig {
    /// Convert to a domain descriptor, validating the entry.
    pub fn to_descriptor(&self) -> Result<ToolDescriptor, ConfigValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigValidationError::EmptyToolName);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigValidationError::ZeroTimeout(name.to_string()));
        }
        let method: HttpMethod =
            self.method
                .parse()
                .map_err(|_| ConfigValidationError::UnknownMethod {
                    tool: name.to_string(),
                    method: self.method.clone(),
                })?;

        let descriptor = ToolDescriptor::new(name, self.endpoint.clone(), method)
            .with_description(self.description.clone())
            .with_timeout_ms(self.timeout_ms);

        let descriptor = self
            .depends_on
            .iter()
            .fold(descriptor, |d, dep| d.depends_on(dep.clone()));

        Ok(self.parameters.iter().fold(descriptor, |d, p| {
            let mut param = ToolParameter::new(p.name.clone(), p.required).with_type(p.param_type.clone());
            param.default = p.default.clone();
            d.with_parameter(param)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_entry_defaults() {
        let tool: FileToolConfig = toml::from_str(
            r#"
name = "search"
endpoint = "http://localhost/search"

[[parameters]]
name = "keyword"
"#,
        )
        .unwrap();

        let descriptor = tool.to_descriptor().unwrap();
        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(descriptor.timeout_ms, 30_000);
        assert_eq!(descriptor.parameters.len(), 1);
        assert!(descriptor.parameters[0].required);
        assert_eq!(descriptor.parameters[0].param_type, "string");
    }

    #[test]
    fn test_optional_parameter_with_default() {
        let tool: FileToolConfig = toml::from_str(
            r#"
name = "search"
endpoint = "http://localhost/search"

[[parameters]]
name = "limit"
required = false
type = "integer"
default = 20
"#,
        )
        .unwrap();

        let descriptor = tool.to_descriptor().unwrap();
        let param = &descriptor.parameters[0];
        assert!(!param.required);
        assert_eq!(param.default, Some(serde_json::json!(20)));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let tool = FileToolConfig {
            name: "x".to_string(),
            description: String::new(),
            endpoint: "http://localhost".to_string(),
            method: "FETCH".to_string(),
            timeout_ms: 100,
            depends_on: vec![],
            parameters: vec![],
        };
        assert_eq!(
            tool.to_descriptor().unwrap_err(),
            ConfigValidationError::UnknownMethod {
                tool: "x".to_string(),
                method: "FETCH".to_string()
            }
        );
    }

    #[test]
    fn test_declared_but_unsupported_method_parses() {
        let tool = FileToolConfig {
            name: "profile".to_string(),
            description: String::new(),
            endpoint: "http://localhost".to_string(),
            method: "patch".to_string(),
            timeout_ms: 100,
            depends_on: vec![],
            parameters: vec![],
        };
        assert_eq!(tool.to_descriptor().unwrap().method, HttpMethod::Patch);
    }
}
