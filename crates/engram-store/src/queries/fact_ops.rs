//! Insert, lookup, supersession, and history paging for facts.

use rusqlite::{params, Connection, OptionalExtension, Row};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::fact::{ConceptKey, Fact};

use super::parse_ts;
use crate::to_storage_err;

const FACT_COLUMNS: &str =
    "id, concept_key, content, version, created_at, updated_at, superseded_by, content_hash";

/// Intermediate row shape; timestamps still raw text.
struct RawFact {
    id: String,
    concept_key: String,
    content: String,
    version: u32,
    created_at: String,
    updated_at: String,
    superseded_by: Option<String>,
    content_hash: String,
}

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawFact> {
    Ok(RawFact {
        id: row.get(0)?,
        concept_key: row.get(1)?,
        content: row.get(2)?,
        version: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        superseded_by: row.get(6)?,
        content_hash: row.get(7)?,
    })
}

fn into_fact(raw: RawFact) -> EngramResult<Fact> {
    Ok(Fact {
        id: raw.id,
        concept_key: ConceptKey::from_normalized(raw.concept_key),
        content: raw.content,
        version: raw.version,
        created_at: parse_ts(&raw.created_at)?,
        updated_at: parse_ts(&raw.updated_at)?,
        superseded_by: raw.superseded_by,
        content_hash: raw.content_hash,
    })
}

/// Insert a fact row. Callers are responsible for transaction scope.
pub fn insert_fact(conn: &Connection, fact: &Fact) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO facts (
            id, concept_key, content, version, created_at, updated_at,
            superseded_by, content_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            fact.id,
            fact.concept_key.as_str(),
            fact.content,
            fact.version,
            fact.created_at.to_rfc3339(),
            fact.updated_at.to_rfc3339(),
            fact.superseded_by,
            fact.content_hash,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_fact: {e}")))?;
    Ok(())
}

/// Fetch a fact by ID.
pub fn get_fact(conn: &Connection, fact_id: &str) -> EngramResult<Option<Fact>> {
    let raw = conn
        .query_row(
            &format!("SELECT {FACT_COLUMNS} FROM facts WHERE id = ?1"),
            params![fact_id],
            read_raw,
        )
        .optional()
        .map_err(|e| to_storage_err(format!("get_fact: {e}")))?;
    raw.map(into_fact).transpose()
}

/// Fetch the active (non-superseded) fact for a concept key.
pub fn get_active(conn: &Connection, concept_key: &ConceptKey) -> EngramResult<Option<Fact>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {FACT_COLUMNS} FROM facts
                 WHERE concept_key = ?1 AND superseded_by IS NULL"
            ),
            params![concept_key.as_str()],
            read_raw,
        )
        .optional()
        .map_err(|e| to_storage_err(format!("get_active: {e}")))?;
    raw.map(into_fact).transpose()
}

/// Atomically mark `old_id` superseded by `new_fact` and insert the
/// successor. The optimistic version check rejects stale callers.
pub fn supersede(
    conn: &Connection,
    old_id: &str,
    new_fact: &Fact,
    expected_version: u32,
) -> EngramResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("supersede begin: {e}")))?;

    let result = supersede_inner(&tx, old_id, new_fact, expected_version);
    match result {
        Ok(()) => tx
            .commit()
            .map_err(|e| to_storage_err(format!("supersede commit: {e}"))),
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn supersede_inner(
    conn: &Connection,
    old_id: &str,
    new_fact: &Fact,
    expected_version: u32,
) -> EngramResult<()> {
    let old = get_fact(conn, old_id)?.ok_or_else(|| EngramError::UnknownFact {
        fact_id: old_id.to_string(),
    })?;

    if !old.is_active() || old.version != expected_version {
        // Either someone already superseded this row or the caller read
        // an older version; both are resolved by reread-then-reapply.
        return Err(EngramError::Conflict {
            concept_key: old.concept_key.to_string(),
            expected: expected_version,
            found: old.version,
        });
    }

    // The successor row does not exist yet; the deferred foreign key on
    // superseded_by is checked at commit, after insert_fact below.
    conn.execute(
        "UPDATE facts SET superseded_by = ?1 WHERE id = ?2",
        params![new_fact.id, old_id],
    )
    .map_err(|e| to_storage_err(format!("supersede update: {e}")))?;

    insert_fact(conn, new_fact)
}

/// One page of a concept's version history, newest first, strictly
/// older than `before_version` when set.
pub fn history_page(
    conn: &Connection,
    concept_key: &ConceptKey,
    before_version: Option<u32>,
    page_size: usize,
) -> EngramResult<Vec<Fact>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FACT_COLUMNS} FROM facts
             WHERE concept_key = ?1 AND (?2 IS NULL OR version < ?2)
             ORDER BY version DESC
             LIMIT ?3"
        ))
        .map_err(|e| to_storage_err(format!("history_page prepare: {e}")))?;

    let rows = stmt
        .query_map(
            params![concept_key.as_str(), before_version, page_size as i64],
            read_raw,
        )
        .map_err(|e| to_storage_err(format!("history_page query: {e}")))?;

    let mut facts = Vec::new();
    for raw in rows {
        let raw = raw.map_err(|e| to_storage_err(format!("history_page row: {e}")))?;
        facts.push(into_fact(raw)?);
    }
    Ok(facts)
}
