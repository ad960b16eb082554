//! Versioned schema migrations, tracked via `PRAGMA user_version`.

mod v001_facts;
mod v002_review_states;
mod v003_interaction_log;
mod v004_degradation_log;

use rusqlite::Connection;

use engram_core::errors::{EngramError, EngramResult, StorageError};

use crate::to_storage_err;

/// Migration list, in order. Index N applies schema version N+1.
const MIGRATIONS: &[fn(&Connection) -> EngramResult<()>] = &[
    v001_facts::migrate,
    v002_review_states::migrate,
    v003_interaction_log::migrate,
    v004_degradation_log::migrate,
];

/// Bring the database up to the current schema version.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (idx, migrate) in MIGRATIONS.iter().enumerate() {
        let version = idx as u32 + 1;
        if version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            EngramError::Storage(StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied schema migration");
    }
    Ok(())
}
