//! Append-only interaction log. Rows are inserted once and never
//! updated or deleted.

use rusqlite::{params, Connection, Row};

use engram_core::errors::EngramResult;
use engram_core::fact::{Interaction, Role};

use super::parse_ts;
use crate::to_storage_err;

/// Append one interaction, returning its rowid.
pub fn append(conn: &Connection, interaction: &Interaction) -> EngramResult<i64> {
    let derived = serde_json::to_string(&interaction.derived_fact_ids)?;
    conn.execute(
        "INSERT INTO interactions (timestamp, role, text, derived_fact_ids)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            interaction.timestamp.to_rfc3339(),
            interaction.role.as_str(),
            interaction.text,
            derived,
        ],
    )
    .map_err(|e| to_storage_err(format!("append interaction: {e}")))?;
    Ok(conn.last_insert_rowid())
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

/// The most recent `limit` interactions, in chronological order.
pub fn recent(conn: &Connection, limit: usize) -> EngramResult<Vec<Interaction>> {
    let mut stmt = conn
        .prepare(
            "SELECT timestamp, role, text, derived_fact_ids FROM interactions
             ORDER BY id DESC LIMIT ?1",
        )
        .map_err(|e| to_storage_err(format!("recent prepare: {e}")))?;

    let rows = stmt
        .query_map(params![limit as i64], read_row)
        .map_err(|e| to_storage_err(format!("recent query: {e}")))?;

    let mut interactions = Vec::new();
    for row in rows {
        let (ts, role, text, derived) =
            row.map_err(|e| to_storage_err(format!("recent row: {e}")))?;
        let role = Role::parse(&role)
            .ok_or_else(|| to_storage_err(format!("bad interaction role '{role}'")))?;
        interactions.push(Interaction {
            timestamp: parse_ts(&ts)?,
            role,
            text,
            derived_fact_ids: serde_json::from_str(&derived)?,
        });
    }
    interactions.reverse();
    Ok(interactions)
}
