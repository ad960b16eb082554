//! v002: review_states, one row per active fact.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS review_states (
            fact_id             TEXT PRIMARY KEY REFERENCES facts(id),
            phase               TEXT NOT NULL,
            strength            REAL NOT NULL,
            ease_factor         REAL NOT NULL,
            interval_days       REAL NOT NULL,
            due_at              TEXT NOT NULL,
            last_tested_at      TEXT,
            consecutive_correct INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_review_due ON review_states(due_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
