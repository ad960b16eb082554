use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Fact store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Rows fetched per page by the history iterator.
    pub history_page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(defaults::DEFAULT_DB_PATH),
            history_page_size: defaults::DEFAULT_HISTORY_PAGE_SIZE,
        }
    }
}
