//! Static tool registry
//!
//! Read-only registry built once from configuration and shared across
//! batches behind an `Arc`.

use crate::config::{ConfigValidationError, FileConfig};
use toolflow_domain::{ToolCatalog, ToolDescriptor, ToolLookup};
use tracing::debug;

/// Registry backed by an immutable [`ToolCatalog`]
#[derive(Debug, Clone, Default)]
pub struct StaticToolRegistry {
    catalog: ToolCatalog,
}

impl StaticToolRegistry {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self { catalog }
    }

    /// Build the registry from the `[[tools]]` entries of a config.
    pub fn from_config(config: &FileConfig) -> Result<Self, ConfigValidationError> {
        let catalog = config.build_catalog()?;
        debug!(tools = catalog.len(), "Tool registry loaded");
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// All registered tools, sorted by name
    pub fn tools(&self) -> Vec<&ToolDescriptor> {
        self.catalog.all()
    }
}

impl ToolLookup for StaticToolRegistry {
    fn descriptor(&self, name: &str) -> Option<ToolDescriptor> {
        self.catalog.get(name).cloned()
    }

    fn dependencies_of(&self, name: &str) -> Option<Vec<String>> {
        self.catalog.get(name).map(|t| t.depends_on.clone())
    }

    fn contains(&self, name: &str) -> bool {
        self.catalog.contains(name)
    }
}
