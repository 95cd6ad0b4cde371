//! Pipeline configuration

use serde::Deserialize;

/// Configuration for one installation pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum concurrent artifact downloads (default: 4)
    pub max_concurrent_downloads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 4,
        }
    }
}
