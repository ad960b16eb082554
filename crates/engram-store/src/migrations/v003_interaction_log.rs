//! v003: append-only interaction log.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS interactions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp        TEXT NOT NULL,
            role             TEXT NOT NULL,
            text             TEXT NOT NULL,
            derived_fact_ids TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_interactions_ts ON interactions(timestamp);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
