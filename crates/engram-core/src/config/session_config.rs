use serde::{Deserialize, Serialize};

use super::defaults;

/// Session orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum due facts pulled per quiz round.
    pub quiz_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quiz_limit: defaults::DEFAULT_QUIZ_LIMIT,
        }
    }
}
