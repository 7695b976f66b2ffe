//! Infrastructure layer for toolflow
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod metrics;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoadError, ConfigLoader, ConfigValidationError, FileConfig, FileDispatchConfig,
    FileParameterConfig, FileRetryConfig, FileToolConfig,
};
pub use metrics::{InMemoryMetrics, MetricsSnapshot, TimerStats, TracingMetricsSink};
pub use tools::{HttpToolDispatcher, StaticToolRegistry};
