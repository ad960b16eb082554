//! Review state persistence.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use engram_core::errors::EngramResult;
use engram_core::review::{EaseFactor, ReviewPhase, ReviewState, Strength};

use super::parse_ts;
use crate::to_storage_err;

const REVIEW_COLUMNS: &str = "fact_id, phase, strength, ease_factor, interval_days, \
                              due_at, last_tested_at, consecutive_correct";

struct RawReview {
    fact_id: String,
    phase: String,
    strength: f64,
    ease_factor: f64,
    interval_days: f64,
    due_at: String,
    last_tested_at: Option<String>,
    consecutive_correct: u32,
}

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawReview> {
    Ok(RawReview {
        fact_id: row.get(0)?,
        phase: row.get(1)?,
        strength: row.get(2)?,
        ease_factor: row.get(3)?,
        interval_days: row.get(4)?,
        due_at: row.get(5)?,
        last_tested_at: row.get(6)?,
        consecutive_correct: row.get(7)?,
    })
}

fn into_state(raw: RawReview) -> EngramResult<ReviewState> {
    let phase = ReviewPhase::parse(&raw.phase)
        .ok_or_else(|| to_storage_err(format!("bad review phase '{}'", raw.phase)))?;
    let last_tested_at = match raw.last_tested_at {
        Some(s) => Some(parse_ts(&s)?),
        None => None,
    };
    Ok(ReviewState {
        fact_id: raw.fact_id,
        phase,
        strength: Strength::new(raw.strength),
        ease_factor: EaseFactor::new(raw.ease_factor),
        interval_days: raw.interval_days,
        due_at: parse_ts(&raw.due_at)?,
        last_tested_at,
        consecutive_correct: raw.consecutive_correct,
    })
}

/// Insert or replace a review state (one row per fact).
pub fn save_state(conn: &Connection, state: &ReviewState) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO review_states (
            fact_id, phase, strength, ease_factor, interval_days,
            due_at, last_tested_at, consecutive_correct
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(fact_id) DO UPDATE SET
            phase = ?2, strength = ?3, ease_factor = ?4, interval_days = ?5,
            due_at = ?6, last_tested_at = ?7, consecutive_correct = ?8",
        params![
            state.fact_id,
            state.phase.as_str(),
            state.strength.value(),
            state.ease_factor.value(),
            state.interval_days,
            state.due_at.to_rfc3339(),
            state.last_tested_at.map(|t| t.to_rfc3339()),
            state.consecutive_correct,
        ],
    )
    .map_err(|e| to_storage_err(format!("save_state: {e}")))?;
    Ok(())
}

/// Fetch the review state for a fact.
pub fn get_state(conn: &Connection, fact_id: &str) -> EngramResult<Option<ReviewState>> {
    let raw = conn
        .query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM review_states WHERE fact_id = ?1"),
            params![fact_id],
            read_raw,
        )
        .optional()
        .map_err(|e| to_storage_err(format!("get_state: {e}")))?;
    raw.map(into_state).transpose()
}

/// Delete the review state for a fact (used when a supersession carries
/// the state over to the successor).
pub fn delete_state(conn: &Connection, fact_id: &str) -> EngramResult<()> {
    conn.execute(
        "DELETE FROM review_states WHERE fact_id = ?1",
        params![fact_id],
    )
    .map_err(|e| to_storage_err(format!("delete_state: {e}")))?;
    Ok(())
}

/// All states due at or before `now`. Ordering is the scheduler's job.
pub fn due_states(conn: &Connection, now: DateTime<Utc>) -> EngramResult<Vec<ReviewState>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM review_states WHERE due_at <= ?1"
        ))
        .map_err(|e| to_storage_err(format!("due_states prepare: {e}")))?;

    let rows = stmt
        .query_map(params![now.to_rfc3339()], read_raw)
        .map_err(|e| to_storage_err(format!("due_states query: {e}")))?;

    let mut states = Vec::new();
    for raw in rows {
        let raw = raw.map_err(|e| to_storage_err(format!("due_states row: {e}")))?;
        states.push(into_state(raw)?);
    }
    Ok(states)
}
