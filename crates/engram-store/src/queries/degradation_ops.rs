//! Fail-open degradation audit rows.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Record one fail-open fallback.
pub fn log(
    conn: &Connection,
    component: &str,
    failure: &str,
    fallback: &str,
) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO degradation_log (component, failure, fallback)
         VALUES (?1, ?2, ?3)",
        params![component, failure, fallback],
    )
    .map_err(|e| to_storage_err(format!("log degradation: {e}")))?;
    Ok(())
}

/// Number of degradation rows for a component (used by tests and health
/// reporting).
pub fn count_for_component(conn: &Connection, component: &str) -> EngramResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM degradation_log WHERE component = ?1",
            params![component],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(format!("count degradation: {e}")))?;
    Ok(count as usize)
}
