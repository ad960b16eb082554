//! Scheduler: the per-fact review state machine and the due queue.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use engram_core::config::SchedulerConfig;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::fact::Fact;
use engram_core::review::{ReviewPhase, ReviewState};
use engram_core::traits::IFactStore;

use crate::formula;

/// A due fact joined with its review state, ready for quizzing.
#[derive(Debug, Clone)]
pub struct DueFact {
    pub fact: Fact,
    pub state: ReviewState,
    pub overdue_days: f64,
}

/// The spaced-repetition scheduler. Stateless apart from configuration;
/// review states live in the store.
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Create and persist the fresh review state for a newly stored fact.
    pub fn init_state(
        &self,
        store: &dyn IFactStore,
        fact_id: &str,
        now: DateTime<Utc>,
    ) -> EngramResult<ReviewState> {
        let state = ReviewState::fresh(fact_id, now);
        store.save_review_state(&state)?;
        Ok(state)
    }

    /// Apply a test outcome to a fact's review state and persist it.
    ///
    /// Fails with `UnknownFact` when no review state exists for the ID.
    pub fn record_outcome(
        &self,
        store: &dyn IFactStore,
        fact_id: &str,
        correct: bool,
        latency: Duration,
        now: DateTime<Utc>,
    ) -> EngramResult<ReviewState> {
        let mut state =
            store
                .get_review_state(fact_id)?
                .ok_or_else(|| EngramError::UnknownFact {
                    fact_id: fact_id.to_string(),
                })?;

        let fast = correct && latency <= Duration::seconds(self.config.fast_latency_secs as i64);

        if correct {
            self.apply_correct(&mut state, fast);
        } else {
            self.apply_incorrect(&mut state);
        }

        state.last_tested_at = Some(now);
        state.due_at = now + days_to_duration(state.interval_days);

        debug_assert!(state.is_consistent());
        debug!(
            fact_id,
            correct,
            fast,
            phase = state.phase.as_str(),
            interval_days = state.interval_days,
            streak = state.consecutive_correct,
            "recorded outcome"
        );

        store.save_review_state(&state)?;
        Ok(state)
    }

    fn apply_correct(&self, state: &mut ReviewState, fast: bool) {
        state.consecutive_correct += 1;
        state.strength = formula::strengthened(state.strength, fast);
        if fast {
            state.ease_factor = state.ease_factor.rewarded(self.config.ease_reward);
        }

        match state.phase {
            ReviewPhase::New => {
                state.phase = ReviewPhase::Learning;
                state.interval_days = self.config.minimal_interval_days;
            }
            ReviewPhase::Learning => {
                if state.consecutive_correct >= self.config.learning_threshold {
                    state.phase = ReviewPhase::Review;
                    state.interval_days = formula::next_interval(
                        state.interval_days,
                        state.ease_factor,
                        self.config.minimal_interval_days,
                    );
                } else {
                    state.interval_days = self.config.minimal_interval_days;
                }
            }
            ReviewPhase::Review | ReviewPhase::Mastered => {
                state.interval_days = formula::next_interval(
                    state.interval_days,
                    state.ease_factor,
                    self.config.minimal_interval_days,
                );
                if state.phase == ReviewPhase::Review
                    && state.interval_days > self.config.mastery_interval_days
                    && state.consecutive_correct >= self.config.mastery_streak
                {
                    state.phase = ReviewPhase::Mastered;
                }
            }
        }
    }

    /// An incorrect answer regresses any phase to Learning: streak reset,
    /// ease penalized, due after the minimal interval.
    fn apply_incorrect(&self, state: &mut ReviewState) {
        state.consecutive_correct = 0;
        state.strength = formula::weakened(state.strength);
        state.ease_factor = state.ease_factor.penalized(self.config.ease_penalty);
        state.phase = ReviewPhase::Learning;
        state.interval_days = self.config.minimal_interval_days;
    }

    /// Facts due at `now`, most overdue first, ties broken by ascending
    /// strength (weakest first).
    pub fn next_due_facts(
        &self,
        store: &dyn IFactStore,
        now: DateTime<Utc>,
        limit: usize,
    ) -> EngramResult<Vec<DueFact>> {
        let mut due = Vec::new();
        for state in store.due_review_states(now)? {
            match store.get(&state.fact_id)? {
                Some(fact) if fact.is_active() => {
                    let overdue_days = state.overdue_days(now);
                    due.push(DueFact {
                        fact,
                        state,
                        overdue_days,
                    });
                }
                Some(_) => {
                    // Superseded fact with a leftover state; stale rows are
                    // harmless but worth flagging.
                    warn!(fact_id = %state.fact_id, "review state points at superseded fact, skipping");
                }
                None => {
                    warn!(fact_id = %state.fact_id, "review state points at missing fact, skipping");
                }
            }
        }

        due.sort_by(|a, b| {
            b.overdue_days
                .partial_cmp(&a.overdue_days)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.state
                        .strength
                        .partial_cmp(&b.state.strength)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        due.truncate(limit);
        Ok(due)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Convert fractional days to a chrono Duration at second precision.
fn days_to_duration(days: f64) -> Duration {
    Duration::seconds((days * 86_400.0).round() as i64)
}
