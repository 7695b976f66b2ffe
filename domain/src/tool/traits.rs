//! Tool domain traits
//!
//! Pure lookup and validation contracts. Both the dependency resolver and the
//! execution orchestrator read tool metadata through [`ToolLookup`]; the
//! registry that backs it lives outside the domain.

use super::entities::{ToolCatalog, ToolDescriptor};
use crate::execution::fault::InvocationFault;
use crate::invocation::InvocationRequest;

/// Read-only access to registered tool metadata.
pub trait ToolLookup: Send + Sync {
    /// Descriptor registered under `name`, if any.
    fn descriptor(&self, name: &str) -> Option<ToolDescriptor>;

    /// Declared dependency names of `name`, or `None` if the tool is unknown.
    fn dependencies_of(&self, name: &str) -> Option<Vec<String>> {
        self.descriptor(name).map(|d| d.depends_on)
    }

    fn contains(&self, name: &str) -> bool {
        self.descriptor(name).is_some()
    }
}

impl ToolLookup for ToolCatalog {
    fn descriptor(&self, name: &str) -> Option<ToolDescriptor> {
        self.get(name).cloned()
    }

    fn dependencies_of(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).map(|d| d.depends_on.clone())
    }

    fn contains(&self, name: &str) -> bool {
        ToolCatalog::contains(self, name)
    }
}

/// Validator for invocation requests
///
/// This is a pure domain trait that validates requests against their
/// descriptors without any I/O operations.
pub trait ParameterValidator {
    fn validate(
        &self,
        request: &InvocationRequest,
        descriptor: &ToolDescriptor,
    ) -> Result<(), InvocationFault>;
}

/// Checks that every required parameter is present and not null.
///
/// Parameters the descriptor does not declare are passed through untouched.
#[derive(Debug, Clone, Default)]
pub struct RequiredParameterValidator;

impl ParameterValidator for RequiredParameterValidator {
    fn validate(
        &self,
        request: &InvocationRequest,
        descriptor: &ToolDescriptor,
    ) -> Result<(), InvocationFault> {
        for param in descriptor.required_parameters() {
            if request.get_param(&param.name).is_none() {
                return Err(InvocationFault::missing_parameter(
                    &descriptor.name,
                    &param.name,
                ));
            }
        }
        Ok(())
    }
}
