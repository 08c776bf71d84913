//! Corpus aggregation settings
//!
//! ```yaml
//! version: 1
//! aggregation:
//!   batch_size: 250
//!   concurrency: 0              # 0 = one worker per CPU
//!   slow_document_threshold_ms: 500
//! ```

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

const MAX_BATCH_SIZE: usize = 100_000;
const MAX_CONCURRENCY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Documents per batch (1..=100000). Batches run strictly one after another.
    pub batch_size: usize,

    /// Documents extracted concurrently within a batch (0=auto, 1..=256)
    pub concurrency: usize,

    /// Extractions slower than this are logged at warn level
    #[serde(rename = "slow_document_threshold_ms", with = "crate::shared::serde_duration")]
    pub slow_document_threshold: Duration,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            concurrency: 0,
            slow_document_threshold: Duration::from_millis(500),
        }
    }
}

impl AggregationConfig {
    pub fn new(batch_size: usize, concurrency: usize) -> Self {
        Self {
            batch_size,
            concurrency,
            ..Self::default()
        }
    }

    pub fn slow_document_threshold(mut self, threshold: Duration) -> Self {
        self.slow_document_threshold = threshold;
        self
    }

    /// Worker count after resolving `0` to the number of CPUs
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency == 0 {
            num_cpus::get().max(1)
        } else {
            self.concurrency
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size < 1 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::range_with_hint(
                "batch_size",
                self.batch_size,
                1,
                MAX_BATCH_SIZE,
                "Batch size bounds peak memory; use at least one document per batch",
            ));
        }

        if self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::range_with_hint(
                "concurrency",
                self.concurrency,
                0,
                MAX_CONCURRENCY,
                "Number of workers must be reasonable (0=auto)",
            ));
        }

        Ok(())
    }

    /// Parse and validate a v1 YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        if !SUPPORTED_VERSIONS.contains(&file.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = file.aggregation.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: 1,
            aggregation: Some(self.clone()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    pub version: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationConfig>,
}
