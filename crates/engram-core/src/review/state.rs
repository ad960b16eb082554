use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ease::EaseFactor;
use super::phase::ReviewPhase;
use super::strength::Strength;

/// Per-fact spaced-repetition state. One-to-one with the active fact of
/// a concept chain; mutated only by the scheduler after a test outcome.
///
/// Invariant: `due_at >= last_tested_at` whenever `last_tested_at` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Active fact this state belongs to.
    pub fact_id: String,
    /// Lifecycle phase.
    pub phase: ReviewPhase,
    /// Accumulated recall strength, tie-breaker for due ordering.
    pub strength: Strength,
    /// Interval growth multiplier.
    pub ease_factor: EaseFactor,
    /// Current review interval in days. 0 until the first test.
    pub interval_days: f64,
    /// When this fact next comes up for testing.
    pub due_at: DateTime<Utc>,
    /// When this fact was last tested, if ever.
    pub last_tested_at: Option<DateTime<Utc>>,
    /// Current streak of correct answers.
    pub consecutive_correct: u32,
}

impl ReviewState {
    /// Fresh state for a newly stored fact: due immediately, no history.
    pub fn fresh(fact_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            fact_id: fact_id.into(),
            phase: ReviewPhase::New,
            strength: Strength::default(),
            ease_factor: EaseFactor::default(),
            interval_days: 0.0,
            due_at: now,
            last_tested_at: None,
            consecutive_correct: 0,
        }
    }

    /// Carry this state over to a successor fact after a supersession.
    /// Review history belongs to the concept, not the text revision.
    pub fn carried_to(&self, successor_fact_id: impl Into<String>) -> Self {
        Self {
            fact_id: successor_fact_id.into(),
            ..self.clone()
        }
    }

    /// How overdue this fact is at `now`, in fractional days.
    /// Negative when the fact is not yet due.
    pub fn overdue_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.due_at).num_seconds() as f64 / 86_400.0
    }

    /// Check the `due_at >= last_tested_at` invariant.
    pub fn is_consistent(&self) -> bool {
        match self.last_tested_at {
            Some(tested) => self.due_at >= tested,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_due_immediately() {
        let now = Utc::now();
        let state = ReviewState::fresh("f1", now);
        assert_eq!(state.phase, ReviewPhase::New);
        assert_eq!(state.due_at, now);
        assert!(state.overdue_days(now).abs() < 1e-9);
        assert!(state.is_consistent());
    }

    #[test]
    fn carry_over_keeps_history_but_rebinds_fact() {
        let now = Utc::now();
        let mut state = ReviewState::fresh("old", now);
        state.consecutive_correct = 2;
        let carried = state.carried_to("new");
        assert_eq!(carried.fact_id, "new");
        assert_eq!(carried.consecutive_correct, 2);
    }
}
