//! Configuration for all subsystems, loadable from a TOML file.

mod defaults;
mod merge_config;
mod scheduler_config;
mod session_config;
mod store_config;

pub use merge_config::MergeConfig;
pub use scheduler_config::SchedulerConfig;
pub use session_config::SessionConfig;
pub use store_config::StoreConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EngramError, EngramResult};

/// Top-level configuration. Every field has a default, so a partial (or
/// absent) TOML file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    pub scheduler: SchedulerConfig,
    pub merge: MergeConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
}

impl EngramConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> EngramResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EngramError::Config {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| EngramError::Config {
            reason: format!("cannot parse {}: {e}", path.display()),
        })
    }
}
