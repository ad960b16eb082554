//! Test doubles and builders shared by integration tests across crates.
//!
//! `ScriptedCollaborator` replays queued responses so classification and
//! grading flows are fully deterministic; `FailingCollaborator` errors on
//! every call for degradation tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use engram_core::errors::CollaboratorError;
use engram_core::fact::{CandidateFact, ConceptKey, Fact, Graded, Interaction, Role};
use engram_core::review::ReviewState;
use engram_core::traits::ICollaborator;

// ── Builders ──────────────────────────────────────────────────────────────

/// Build a fact with a fixed timestamp base.
pub fn fact(concept: &str, content: &str) -> Fact {
    Fact::new(ConceptKey::normalize(concept), content, Utc::now())
}

/// Build a fact at a specific time.
pub fn fact_at(concept: &str, content: &str, now: DateTime<Utc>) -> Fact {
    Fact::new(ConceptKey::normalize(concept), content, now)
}

/// Fresh review state for a fact.
pub fn review_state(fact_id: &str, now: DateTime<Utc>) -> ReviewState {
    ReviewState::fresh(fact_id, now)
}

/// Build a learner interaction.
pub fn learner_says(text: &str, now: DateTime<Utc>) -> Interaction {
    Interaction::new(Role::Learner, text, now)
}

/// Build a tutor interaction.
pub fn tutor_says(text: &str, now: DateTime<Utc>) -> Interaction {
    Interaction::new(Role::Tutor, text, now)
}

// ── Scripted collaborator ─────────────────────────────────────────────────

/// Queue-driven collaborator. Each call pops its queue; an empty queue
/// falls back to a neutral default (novel similarity, no contradiction,
/// empty extraction, templated question, correct grade).
#[derive(Default)]
pub struct ScriptedCollaborator {
    similarities: Mutex<VecDeque<f64>>,
    contradictions: Mutex<VecDeque<bool>>,
    extractions: Mutex<VecDeque<Vec<CandidateFact>>>,
    questions: Mutex<VecDeque<String>>,
    grades: Mutex<VecDeque<Graded>>,
    fail_grading: Mutex<bool>,
}

impl ScriptedCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_similarity(&self, score: f64) -> &Self {
        self.similarities.lock().unwrap().push_back(score);
        self
    }

    pub fn push_contradiction(&self, contradicts: bool) -> &Self {
        self.contradictions.lock().unwrap().push_back(contradicts);
        self
    }

    pub fn push_extraction(&self, candidates: Vec<CandidateFact>) -> &Self {
        self.extractions.lock().unwrap().push_back(candidates);
        self
    }

    pub fn push_question(&self, question: &str) -> &Self {
        self.questions.lock().unwrap().push_back(question.to_string());
        self
    }

    pub fn push_grade(&self, correct: bool, feedback: &str) -> &Self {
        self.grades.lock().unwrap().push_back(Graded {
            correct,
            feedback: feedback.to_string(),
        });
        self
    }

    /// Make every subsequent `grade_answer` call fail.
    pub fn fail_grading(&self) -> &Self {
        *self.fail_grading.lock().unwrap() = true;
        self
    }
}

impl ICollaborator for ScriptedCollaborator {
    fn extract_facts(
        &self,
        _transcript: &[Interaction],
    ) -> Result<Vec<CandidateFact>, CollaboratorError> {
        Ok(self
            .extractions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    fn score_similarity(&self, _a: &str, _b: &str) -> Result<f64, CollaboratorError> {
        Ok(self.similarities.lock().unwrap().pop_front().unwrap_or(0.0))
    }

    fn detect_contradiction(
        &self,
        _stored: &str,
        _candidate: &str,
    ) -> Result<bool, CollaboratorError> {
        Ok(self
            .contradictions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false))
    }

    fn generate_question(&self, fact: &Fact) -> Result<String, CollaboratorError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("Explain: {}", fact.concept_key)))
    }

    fn grade_answer(
        &self,
        _fact: &Fact,
        _question: &str,
        _answer: &str,
    ) -> Result<Graded, CollaboratorError> {
        if *self.fail_grading.lock().unwrap() {
            return Err(CollaboratorError::MalformedResponse {
                task: "grade".to_string(),
                detail: "scripted failure".to_string(),
            });
        }
        Ok(self.grades.lock().unwrap().pop_front().unwrap_or(Graded {
            correct: true,
            feedback: "ok".to_string(),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }
}

// ── Failing collaborator ──────────────────────────────────────────────────

/// Collaborator that fails every call, for fail-open degradation tests.
pub struct FailingCollaborator;

impl FailingCollaborator {
    fn unavailable(&self) -> CollaboratorError {
        CollaboratorError::Unavailable {
            provider: self.name().to_string(),
        }
    }
}

impl ICollaborator for FailingCollaborator {
    fn extract_facts(
        &self,
        _transcript: &[Interaction],
    ) -> Result<Vec<CandidateFact>, CollaboratorError> {
        Err(self.unavailable())
    }

    fn score_similarity(&self, _a: &str, _b: &str) -> Result<f64, CollaboratorError> {
        Err(self.unavailable())
    }

    fn detect_contradiction(
        &self,
        _stored: &str,
        _candidate: &str,
    ) -> Result<bool, CollaboratorError> {
        Err(self.unavailable())
    }

    fn generate_question(&self, _fact: &Fact) -> Result<String, CollaboratorError> {
        Err(self.unavailable())
    }

    fn grade_answer(
        &self,
        _fact: &Fact,
        _question: &str,
        _answer: &str,
    ) -> Result<Graded, CollaboratorError> {
        Err(self.unavailable())
    }

    fn name(&self) -> &str {
        "offline"
    }

    fn is_available(&self) -> bool {
        false
    }
}
