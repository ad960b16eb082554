//! v004: degradation_log, one row per fail-open fallback taken when the
//! collaborator errored or returned garbage.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS degradation_log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            component TEXT NOT NULL,
            failure   TEXT NOT NULL,
            fallback  TEXT NOT NULL,
            timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_degradation_component ON degradation_log(component);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
