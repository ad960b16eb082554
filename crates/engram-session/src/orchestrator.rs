//! TutorSession: teach and test turns, one at a time, start to finish.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use engram_core::config::SessionConfig;
use engram_core::constants::{MAX_DERIVED_FACTS_PER_TURN, MAX_TRANSCRIPT_WINDOW};
use engram_core::errors::EngramResult;
use engram_core::fact::{CandidateFact, Fact, Interaction, Role};
use engram_core::review::ReviewState;
use engram_core::traits::{ICollaborator, IFactStore};
use engram_merge::{Classification, MergeEngine};
use engram_scheduler::Scheduler;

use crate::report::{AnswerReport, CandidateOutcome, QuizItem, TeachReport};

/// Degradation-log component names for this crate.
const EXTRACT_COMPONENT: &str = "session.extract";
const QUIZ_COMPONENT: &str = "session.quiz";
const GRADE_COMPONENT: &str = "session.grade";

/// One tutoring session. Processes a turn start-to-finish before the
/// next begins; the store serializes writes if sessions ever overlap.
pub struct TutorSession {
    store: Arc<dyn IFactStore>,
    collaborator: Box<dyn ICollaborator>,
    merge: MergeEngine,
    scheduler: Scheduler,
    config: SessionConfig,
}

impl TutorSession {
    pub fn new(
        store: Arc<dyn IFactStore>,
        collaborator: Box<dyn ICollaborator>,
        merge: MergeEngine,
        scheduler: Scheduler,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            collaborator,
            merge,
            scheduler,
            config,
        }
    }

    /// Teach mode: ingest one learner/tutor exchange, extract candidate
    /// facts, reconcile each against the store, and log the exchange.
    ///
    /// Extraction failure degrades to an empty candidate set (the
    /// exchange is still logged); persistence failures abort the turn.
    pub fn teach_turn(
        &self,
        learner_text: &str,
        tutor_text: &str,
        now: DateTime<Utc>,
    ) -> EngramResult<TeachReport> {
        let mut report = TeachReport::default();

        let mut window = self.store.recent_interactions(MAX_TRANSCRIPT_WINDOW)?;
        window.push(Interaction::new(Role::Learner, learner_text, now));
        window.push(Interaction::new(Role::Tutor, tutor_text, now));

        let mut candidates = match self.collaborator.extract_facts(&window) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(component = EXTRACT_COMPONENT, error = %e, "extraction failed, continuing without candidates");
                self.store
                    .log_degradation(EXTRACT_COMPONENT, &e.to_string(), "no facts derived")?;
                report.degraded = true;
                Vec::new()
            }
        };
        candidates.truncate(MAX_DERIVED_FACTS_PER_TURN);

        for candidate in &candidates {
            if candidate.concept_key.is_empty() {
                warn!("skipping candidate with empty concept key");
                continue;
            }
            let outcome = match self.apply_candidate(candidate, now) {
                Ok(outcome) => outcome,
                Err(e) if e.is_retryable() => {
                    // Reread-then-reapply, once.
                    warn!(error = %e, concept = %candidate.concept_key, "retrying candidate after conflict");
                    self.apply_candidate(candidate, now)?
                }
                Err(e) => return Err(e),
            };
            if outcome.degraded {
                report.degraded = true;
            }
            report.outcomes.push(outcome.outcome);
        }

        let derived: Vec<String> = report
            .outcomes
            .iter()
            .map(|o| o.fact_id.clone())
            .collect();
        let mut learner = Interaction::new(Role::Learner, learner_text, now);
        learner.derived_fact_ids = derived.clone();
        let mut tutor = Interaction::new(Role::Tutor, tutor_text, now);
        tutor.derived_fact_ids = derived;
        self.store.append_interaction(&learner)?;
        self.store.append_interaction(&tutor)?;

        info!(
            candidates = report.outcomes.len(),
            degraded = report.degraded,
            "teach turn complete"
        );
        Ok(report)
    }

    /// Test mode, step 1: pull the most overdue fact and generate a
    /// question for it. Returns `None` when nothing is due or when
    /// question generation degraded (the quiz is skipped, not failed).
    pub fn next_quiz(&self, now: DateTime<Utc>) -> EngramResult<Option<QuizItem>> {
        let due = self
            .scheduler
            .next_due_facts(self.store.as_ref(), now, self.config.quiz_limit)?;
        let Some(first) = due.first() else {
            return Ok(None);
        };

        match self.collaborator.generate_question(&first.fact) {
            Ok(question) => Ok(Some(QuizItem {
                fact_id: first.fact.id.clone(),
                concept_key: first.fact.concept_key.clone(),
                question,
            })),
            Err(e) => {
                warn!(component = QUIZ_COMPONENT, error = %e, "question generation failed, skipping quiz");
                self.store
                    .log_degradation(QUIZ_COMPONENT, &e.to_string(), "quiz skipped")?;
                Ok(None)
            }
        }
    }

    /// Test mode, step 2: grade the learner's answer and record the
    /// outcome. Grading failure degrades (no outcome recorded); a
    /// conflict under the fact is retried once against the current
    /// active fact for the concept.
    pub fn submit_answer(
        &self,
        quiz: &QuizItem,
        answer: &str,
        latency: Duration,
        now: DateTime<Utc>,
    ) -> EngramResult<AnswerReport> {
        let fact = match self.store.get(&quiz.fact_id)? {
            Some(fact) => fact,
            None => {
                return Err(engram_core::errors::EngramError::UnknownFact {
                    fact_id: quiz.fact_id.clone(),
                })
            }
        };

        let graded = match self.collaborator.grade_answer(&fact, &quiz.question, answer) {
            Ok(graded) => graded,
            Err(e) => {
                warn!(component = GRADE_COMPONENT, error = %e, "grading failed, outcome not recorded");
                self.store
                    .log_degradation(GRADE_COMPONENT, &e.to_string(), "outcome not recorded")?;
                return Ok(AnswerReport::degraded());
            }
        };

        let review = self.record_with_retry(quiz, graded.correct, latency, now)?;

        let mut logged = Interaction::new(Role::Learner, answer, now);
        logged.derived_fact_ids = vec![quiz.fact_id.clone()];
        self.store.append_interaction(&logged)?;

        info!(
            concept = %quiz.concept_key,
            correct = graded.correct,
            phase = review.phase.as_str(),
            "answer recorded"
        );
        Ok(AnswerReport {
            graded: Some(graded),
            review: Some(review),
            degraded: false,
        })
    }

    /// Record an outcome, retrying once against the current active fact
    /// if the quizzed fact was superseded mid-turn.
    fn record_with_retry(
        &self,
        quiz: &QuizItem,
        correct: bool,
        latency: Duration,
        now: DateTime<Utc>,
    ) -> EngramResult<ReviewState> {
        match self.scheduler.record_outcome(
            self.store.as_ref(),
            &quiz.fact_id,
            correct,
            latency,
            now,
        ) {
            Ok(state) => Ok(state),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, concept = %quiz.concept_key, "rereading active fact and retrying outcome");
                let active = self.store.get_active(&quiz.concept_key)?.ok_or(e)?;
                self.scheduler
                    .record_outcome(self.store.as_ref(), &active.id, correct, latency, now)
            }
            Err(e) => Err(e),
        }
    }

    /// Reconcile one candidate against the store.
    fn apply_candidate(
        &self,
        candidate: &CandidateFact,
        now: DateTime<Utc>,
    ) -> EngramResult<AppliedCandidate> {
        let existing = self.store.get_active(&candidate.concept_key)?;
        let outcome =
            self.merge
                .classify(self.collaborator.as_ref(), candidate, existing.as_ref());

        let degraded = outcome.degradation.is_some();
        if let Some(d) = &outcome.degradation {
            self.store
                .log_degradation(engram_merge::classifier::COMPONENT, &d.failure, &d.fallback)?;
        }

        let label = outcome.classification.label();
        let applied = if let Some(existing) = existing {
            match outcome.classification {
                Classification::Duplicate => CandidateOutcome {
                    concept_key: candidate.concept_key.clone(),
                    label,
                    fact_id: existing.id,
                    diff: None,
                },
                Classification::New => {
                    // Same concept key but substantively different
                    // content: supersede so the single-active invariant
                    // holds, with a fresh review state for the new
                    // material.
                    let fact_id =
                        self.supersede_active(&existing, &candidate.content, now, false)?;
                    CandidateOutcome {
                        concept_key: candidate.concept_key.clone(),
                        label,
                        fact_id,
                        diff: None,
                    }
                }
                Classification::Update(diff) => {
                    let fact_id =
                        self.supersede_active(&existing, &candidate.content, now, true)?;
                    CandidateOutcome {
                        concept_key: candidate.concept_key.clone(),
                        label,
                        fact_id,
                        diff: Some(diff),
                    }
                }
            }
        } else {
            // No active fact for this concept; classify always says New.
            let fact = Fact::new(candidate.concept_key.clone(), &candidate.content, now);
            self.store.upsert(&fact)?;
            self.scheduler.init_state(self.store.as_ref(), &fact.id, now)?;
            CandidateOutcome {
                concept_key: candidate.concept_key.clone(),
                label,
                fact_id: fact.id,
                diff: None,
            }
        };

        Ok(AppliedCandidate {
            outcome: applied,
            degraded,
        })
    }

    /// Supersede the active fact with new content. Review history is
    /// carried to the successor for updates and reset for new material.
    fn supersede_active(
        &self,
        existing: &Fact,
        content: &str,
        now: DateTime<Utc>,
        carry_review: bool,
    ) -> EngramResult<String> {
        let successor = existing.successor(content, now);
        self.store
            .supersede(&existing.id, &successor, existing.version)?;

        let prior = self.store.get_review_state(&existing.id)?;
        match (carry_review, prior) {
            (true, Some(prior)) => {
                self.store
                    .save_review_state(&prior.carried_to(&successor.id))?;
                self.store.delete_review_state(&existing.id)?;
            }
            (_, prior) => {
                if prior.is_some() {
                    self.store.delete_review_state(&existing.id)?;
                }
                self.scheduler
                    .init_state(self.store.as_ref(), &successor.id, now)?;
            }
        }
        Ok(successor.id)
    }
}

struct AppliedCandidate {
    outcome: CandidateOutcome,
    degraded: bool,
}
