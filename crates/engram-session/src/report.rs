//! Per-turn result types returned to the CLI boundary.

use engram_core::fact::{ConceptKey, Graded};
use engram_core::review::ReviewState;
use engram_merge::DiffSummary;

/// What happened to one extracted candidate during a teach turn.
#[derive(Debug, Clone)]
pub struct CandidateOutcome {
    pub concept_key: ConceptKey,
    /// "new", "duplicate", or "update".
    pub label: &'static str,
    /// Active fact holding this concept after the turn.
    pub fact_id: String,
    /// Audit diff, present for updates.
    pub diff: Option<DiffSummary>,
}

/// Result of a teach turn.
#[derive(Debug, Clone, Default)]
pub struct TeachReport {
    pub outcomes: Vec<CandidateOutcome>,
    /// True when any fail-open fallback was taken this turn.
    pub degraded: bool,
}

/// A quiz question for the most overdue fact.
#[derive(Debug, Clone)]
pub struct QuizItem {
    pub fact_id: String,
    pub concept_key: ConceptKey,
    pub question: String,
}

/// Result of answering a quiz question.
#[derive(Debug, Clone)]
pub struct AnswerReport {
    /// Grading verdict; absent when grading degraded.
    pub graded: Option<Graded>,
    /// Updated review state; absent when no outcome was recorded.
    pub review: Option<ReviewState>,
    pub degraded: bool,
}

impl AnswerReport {
    /// Report for a turn where grading failed and nothing was recorded.
    pub fn degraded() -> Self {
        Self {
            graded: None,
            review: None,
            degraded: true,
        }
    }
}
