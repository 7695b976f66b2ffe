//! Tool adapters
//!
//! - [`registry`]: read-only tool registry built from configuration
//! - [`http`]: HTTP dispatcher for tool endpoints

pub mod http;
pub mod registry;

pub use http::HttpToolDispatcher;
pub use registry::StaticToolRegistry;
