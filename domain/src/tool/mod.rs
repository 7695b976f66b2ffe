//! Tool domain module
//!
//! A tool is a named, remotely invocable capability. Its metadata is a
//! [`ToolDescriptor`]: endpoint, HTTP-style method, timeout budget, declared
//! parameters and the names of the tools it depends on.
//!
//! ```text
//! ┌────────────────┐    ┌───────────────────┐    ┌──────────────────┐
//! │ ToolCatalog    │───▶│ ToolDescriptor    │───▶│ ParameterValidator│
//! │ (ToolLookup)   │    │ (endpoint, deps)  │    │ (required params) │
//! └────────────────┘    └───────────────────┘    └──────────────────┘
//! ```
//!
//! The registry that owns descriptors is external; the domain only reads it
//! through [`ToolLookup`].

pub mod entities;
pub mod traits;

pub use entities::{HttpMethod, ToolCatalog, ToolDescriptor, ToolParameter};
pub use traits::{ParameterValidator, RequiredParameterValidator, ToolLookup};
