use serde::{Deserialize, Serialize};

use super::defaults;

/// Dedup/merge engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Similarity below this means the candidate is a distinct fact.
    pub novelty_threshold: f64,
    /// Similarity at or above this (without contradiction) is a duplicate.
    pub duplicate_threshold: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            novelty_threshold: defaults::DEFAULT_NOVELTY_THRESHOLD,
            duplicate_threshold: defaults::DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}
