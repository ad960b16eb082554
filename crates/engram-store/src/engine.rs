//! StoreEngine: owns the SQLite connection, applies pragmas, runs
//! migrations, and implements IFactStore.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use engram_core::errors::{EngramError, EngramResult};
use engram_core::fact::{ConceptKey, Fact, Interaction};
use engram_core::review::ReviewState;
use engram_core::traits::{FactHistory, IFactStore};

use crate::queries::{degradation_ops, fact_ops, interaction_ops, review_ops};
use crate::{migrations, pragmas, to_storage_err};

/// The fact store. A single connection behind a mutex: the interaction
/// model is one turn at a time, and the mutex serializes writers if
/// sessions ever overlap.
pub struct StoreEngine {
    conn: Mutex<Connection>,
    history_page_size: usize,
}

impl StoreEngine {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> EngramResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| to_storage_err(format!("open {}: {e}", path.display())))?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> EngramResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| to_storage_err(format!("open in-memory: {e}")))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> EngramResult<Self> {
        pragmas::apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            history_page_size: engram_core::config::StoreConfig::default().history_page_size,
        })
    }

    /// Override the history iterator's page size.
    pub fn with_history_page_size(mut self, page_size: usize) -> Self {
        self.history_page_size = page_size.max(1);
        self
    }

    /// Lazy, restartable iterator over a concept's version history,
    /// newest first.
    pub fn history(&self, concept_key: &ConceptKey) -> FactHistory<'_> {
        FactHistory::new(self, concept_key.clone(), self.history_page_size)
    }

    /// Degradation rows recorded for a component.
    pub fn degradation_count(&self, component: &str) -> EngramResult<usize> {
        self.with_conn(|conn| degradation_ops::count_for_component(conn, component))
    }

    /// Whether WAL journaling is active. In-memory databases report
    /// `memory` and return false.
    pub fn verify_wal_mode(&self) -> EngramResult<bool> {
        self.with_conn(pragmas::verify_wal_mode)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> EngramResult<T>) -> EngramResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| to_storage_err("connection mutex poisoned"))?;
        f(&conn)
    }
}

impl IFactStore for StoreEngine {
    fn upsert(&self, fact: &Fact) -> EngramResult<()> {
        self.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(format!("upsert begin: {e}")))?;

            // The partial unique index would also reject this, but the
            // explicit check produces a Conflict the caller can retry.
            if let Some(existing) = fact_ops::get_active(&tx, &fact.concept_key)? {
                return Err(EngramError::Conflict {
                    concept_key: fact.concept_key.to_string(),
                    expected: 0,
                    found: existing.version,
                });
            }
            fact_ops::insert_fact(&tx, fact)?;
            tx.commit()
                .map_err(|e| to_storage_err(format!("upsert commit: {e}")))
        })
    }

    fn get(&self, fact_id: &str) -> EngramResult<Option<Fact>> {
        self.with_conn(|conn| fact_ops::get_fact(conn, fact_id))
    }

    fn get_active(&self, concept_key: &ConceptKey) -> EngramResult<Option<Fact>> {
        self.with_conn(|conn| fact_ops::get_active(conn, concept_key))
    }

    fn supersede(
        &self,
        old_id: &str,
        new_fact: &Fact,
        expected_version: u32,
    ) -> EngramResult<()> {
        self.with_conn(|conn| fact_ops::supersede(conn, old_id, new_fact, expected_version))
    }

    fn history_page(
        &self,
        concept_key: &ConceptKey,
        before_version: Option<u32>,
        page_size: usize,
    ) -> EngramResult<Vec<Fact>> {
        self.with_conn(|conn| fact_ops::history_page(conn, concept_key, before_version, page_size))
    }

    fn save_review_state(&self, state: &ReviewState) -> EngramResult<()> {
        self.with_conn(|conn| review_ops::save_state(conn, state))
    }

    fn get_review_state(&self, fact_id: &str) -> EngramResult<Option<ReviewState>> {
        self.with_conn(|conn| review_ops::get_state(conn, fact_id))
    }

    fn delete_review_state(&self, fact_id: &str) -> EngramResult<()> {
        self.with_conn(|conn| review_ops::delete_state(conn, fact_id))
    }

    fn due_review_states(&self, now: DateTime<Utc>) -> EngramResult<Vec<ReviewState>> {
        self.with_conn(|conn| review_ops::due_states(conn, now))
    }

    fn append_interaction(&self, interaction: &Interaction) -> EngramResult<i64> {
        self.with_conn(|conn| interaction_ops::append(conn, interaction))
    }

    fn recent_interactions(&self, limit: usize) -> EngramResult<Vec<Interaction>> {
        self.with_conn(|conn| interaction_ops::recent(conn, limit))
    }

    fn log_degradation(
        &self,
        component: &str,
        failure: &str,
        fallback: &str,
    ) -> EngramResult<()> {
        self.with_conn(|conn| degradation_ops::log(conn, component, failure, fallback))
    }
}
