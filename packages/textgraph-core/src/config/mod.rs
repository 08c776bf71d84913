//! Configuration
//!
//! Programmatic (`AggregationConfig::new`) or versioned YAML
//! (`AggregationConfig::from_yaml`). Both paths go through `validate`
//! before an aggregator accepts the config.

pub mod aggregation;
pub mod error;

pub use aggregation::{AggregationConfig, ConfigFileV1};
pub use error::{ConfigError, ConfigResult};
