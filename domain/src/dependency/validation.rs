//! Batch-wide missing dependency check.
//!
//! Runs before resolution: a tool whose declared dependency is not part of the
//! batch cannot be executed meaningfully, so the caller short-circuits the
//! whole batch instead of letting the resolver silently drop the edge.

use crate::invocation::InvocationRequest;
use crate::tool::traits::ToolLookup;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A dependency that was declared but not requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDependency {
    pub name: String,
    /// Description from the registry, if the dependency is registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl std::fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) if !description.is_empty() => {
                write!(f, "'{}' ({})", self.name, description)
            }
            _ => write!(f, "'{}'", self.name),
        }
    }
}

/// Missing dependencies of one requested tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMissingDependencies {
    pub tool_name: String,
    pub missing: Vec<MissingDependency>,
}

impl ToolMissingDependencies {
    pub fn message(&self) -> String {
        let names = self
            .missing
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let verb = if self.missing.len() == 1 { "was" } else { "were" };
        format!(
            "Tool '{}' requires {}, which {} not requested",
            self.tool_name, names, verb
        )
    }
}

/// Per-tool list of dependencies absent from a batch, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDependencyReport {
    pub entries: Vec<ToolMissingDependencies>,
}

impl MissingDependencyReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn for_tool(&self, tool_name: &str) -> Option<&ToolMissingDependencies> {
        self.entries.iter().find(|e| e.tool_name == tool_name)
    }
}

impl std::fmt::Display for MissingDependencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.entries.iter().map(|e| e.message()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Find declared dependencies that are not part of `batch`.
///
/// Each tool name is reported once, even if requested several times. Tools
/// the registry does not know are skipped here; resolution reports them.
pub fn find_missing_dependencies<L: ToolLookup + ?Sized>(
    batch: &[InvocationRequest],
    lookup: &L,
) -> MissingDependencyReport {
    let requested: HashSet<&str> = batch.iter().map(|r| r.tool_name.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for request in batch {
        if !seen.insert(request.tool_name.as_str()) {
            continue;
        }
        let Some(dependencies) = lookup.dependencies_of(&request.tool_name) else {
            continue;
        };

        let mut missing: Vec<MissingDependency> = Vec::new();
        for dependency in dependencies {
            if requested.contains(dependency.as_str())
                || missing.iter().any(|m| m.name == dependency)
            {
                continue;
            }
            let description = lookup.descriptor(&dependency).map(|d| d.description);
            missing.push(MissingDependency {
                name: dependency,
                description,
            });
        }

        if !missing.is_empty() {
            entries.push(ToolMissingDependencies {
                tool_name: request.tool_name.clone(),
                missing,
            });
        }
    }

    MissingDependencyReport { entries }
}
