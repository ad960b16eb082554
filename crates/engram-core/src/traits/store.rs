use chrono::{DateTime, Utc};

use crate::errors::EngramResult;
use crate::fact::{ConceptKey, Fact, Interaction};
use crate::review::ReviewState;

/// Durable storage contract: facts + review states + interaction log +
/// degradation audit.
///
/// All fact writes are atomic per concept key. `supersede` performs an
/// optimistic version check and fails with `EngramError::Conflict` when
/// the caller's view is stale; callers recover by rereading and
/// reapplying.
pub trait IFactStore: Send + Sync {
    // --- Facts ---
    /// Insert a new active fact. Fails if another active fact already
    /// holds the same concept key.
    fn upsert(&self, fact: &Fact) -> EngramResult<()>;
    fn get(&self, fact_id: &str) -> EngramResult<Option<Fact>>;
    fn get_active(&self, concept_key: &ConceptKey) -> EngramResult<Option<Fact>>;
    /// Atomically mark `old_id` superseded and insert its successor.
    /// `expected_version` is the version the caller last read.
    fn supersede(&self, old_id: &str, new_fact: &Fact, expected_version: u32)
        -> EngramResult<()>;
    /// One page of version history for a concept, newest first, strictly
    /// older than `before_version` when set. Building block for
    /// [`FactHistory`].
    fn history_page(
        &self,
        concept_key: &ConceptKey,
        before_version: Option<u32>,
        page_size: usize,
    ) -> EngramResult<Vec<Fact>>;

    // --- Review states ---
    fn save_review_state(&self, state: &ReviewState) -> EngramResult<()>;
    fn get_review_state(&self, fact_id: &str) -> EngramResult<Option<ReviewState>>;
    fn delete_review_state(&self, fact_id: &str) -> EngramResult<()>;
    /// All states with `due_at <= now`, unordered; the scheduler sorts.
    fn due_review_states(&self, now: DateTime<Utc>) -> EngramResult<Vec<ReviewState>>;

    // --- Interaction log (append-only) ---
    fn append_interaction(&self, interaction: &Interaction) -> EngramResult<i64>;
    fn recent_interactions(&self, limit: usize) -> EngramResult<Vec<Interaction>>;

    // --- Audit ---
    fn log_degradation(&self, component: &str, failure: &str, fallback: &str)
        -> EngramResult<()>;
}

/// Lazy, finite, restartable iterator over a concept's version history,
/// newest first. Pages through the store by descending version so the
/// sequence can be restarted (or re-created) without holding any
/// database resources between steps.
pub struct FactHistory<'a> {
    store: &'a dyn IFactStore,
    concept_key: ConceptKey,
    page_size: usize,
    buffer: std::collections::VecDeque<Fact>,
    before_version: Option<u32>,
    exhausted: bool,
}

impl<'a> FactHistory<'a> {
    pub fn new(store: &'a dyn IFactStore, concept_key: ConceptKey, page_size: usize) -> Self {
        Self {
            store,
            concept_key,
            page_size: page_size.max(1),
            buffer: std::collections::VecDeque::new(),
            before_version: None,
            exhausted: false,
        }
    }

    /// Rewind to the newest version; the next call to `next` re-queries.
    pub fn restart(&mut self) {
        self.buffer.clear();
        self.before_version = None;
        self.exhausted = false;
    }

    fn refill(&mut self) -> EngramResult<()> {
        let page =
            self.store
                .history_page(&self.concept_key, self.before_version, self.page_size)?;
        if page.len() < self.page_size {
            self.exhausted = true;
        }
        if let Some(last) = page.last() {
            self.before_version = Some(last.version);
        }
        self.buffer.extend(page);
        Ok(())
    }
}

impl Iterator for FactHistory<'_> {
    type Item = EngramResult<Fact>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() {
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.refill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
