//! v001: facts table with the single-active-per-concept invariant
//! enforced by a partial unique index.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS facts (
            id            TEXT PRIMARY KEY,
            concept_key   TEXT NOT NULL,
            content       TEXT NOT NULL,
            version       INTEGER NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            superseded_by TEXT REFERENCES facts(id)
                          DEFERRABLE INITIALLY DEFERRED,
            content_hash  TEXT NOT NULL,
            UNIQUE (concept_key, version)
        );

        CREATE INDEX IF NOT EXISTS idx_facts_concept ON facts(concept_key);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_facts_active
            ON facts(concept_key) WHERE superseded_by IS NULL;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
