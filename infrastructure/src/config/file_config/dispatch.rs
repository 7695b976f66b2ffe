//! Dispatch configuration from TOML (`[dispatch]` section)
//!
//! Transport settings for the HTTP dispatcher. Per-tool deadlines are set on
//! each tool, not here.

use serde::{Deserialize, Serialize};

/// Raw dispatch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// User-Agent header sent with every call
    pub user_agent: String,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("toolflow/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_ms: 5_000,
        }
    }
}
