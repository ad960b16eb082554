//! End-to-end tests for the session orchestrator: teach turns, quiz
//! turns, fail-open degradation, and conflict recovery.

use std::sync::Arc;

use chrono::{Duration, Utc};

use engram_core::config::{MergeConfig, SchedulerConfig, SessionConfig};
use engram_core::fact::{CandidateFact, ConceptKey, Fact};
use engram_core::review::{ReviewPhase, ReviewState};
use engram_core::traits::{ICollaborator, IFactStore};
use engram_merge::MergeEngine;
use engram_scheduler::Scheduler;
use engram_session::TutorSession;
use engram_store::StoreEngine;
use test_fixtures::{FailingCollaborator, ScriptedCollaborator};

fn key(raw: &str) -> ConceptKey {
    ConceptKey::normalize(raw)
}

fn session_with(
    store: Arc<StoreEngine>,
    collaborator: Box<dyn ICollaborator>,
) -> TutorSession {
    TutorSession::new(
        store,
        collaborator,
        MergeEngine::new(MergeConfig::default()),
        Scheduler::new(SchedulerConfig::default()),
        SessionConfig::default(),
    )
}

// ── Teach mode ────────────────────────────────────────────────────────────

#[test]
fn teach_turn_stores_new_facts_with_fresh_review_states() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let collaborator = ScriptedCollaborator::new();
    collaborator.push_extraction(vec![
        CandidateFact::new(key("mean"), "The mean is the average."),
        CandidateFact::new(key("median"), "The median is the middle value."),
    ]);
    let session = session_with(Arc::clone(&store), Box::new(collaborator));
    let now = Utc::now();

    let report = session
        .teach_turn("what are mean and median?", "the mean is... the median is...", now)
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(!report.degraded);
    assert!(report.outcomes.iter().all(|o| o.label == "new"));

    for concept in ["mean", "median"] {
        let fact = store.get_active(&key(concept)).unwrap().unwrap();
        let state = store.get_review_state(&fact.id).unwrap().unwrap();
        assert_eq!(state.phase, ReviewPhase::New);
        assert_eq!(state.due_at, now);
    }

    // Both utterances were logged, tagged with the derived facts.
    let log = store.recent_interactions(10).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].derived_fact_ids.len(), 2);
}

#[test]
fn duplicate_candidate_leaves_the_chain_untouched() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let now = Utc::now();
    let fact = Fact::new(key("mean"), "The mean is the average.", now);
    store.upsert(&fact).unwrap();

    let collaborator = ScriptedCollaborator::new();
    // Identical content: the hash short-circuit classifies duplicate.
    collaborator.push_extraction(vec![CandidateFact::new(
        key("mean"),
        "The mean is the average.",
    )]);
    let session = session_with(Arc::clone(&store), Box::new(collaborator));

    let report = session.teach_turn("again?", "as before", now).unwrap();
    assert_eq!(report.outcomes[0].label, "duplicate");
    assert_eq!(report.outcomes[0].fact_id, fact.id);
    assert_eq!(store.get_active(&key("mean")).unwrap().unwrap().version, 1);
}

#[test]
fn contradicting_candidate_supersedes_and_carries_review_history() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let now = Utc::now();
    let fact = Fact::new(key("variance"), "Variance divides by n.", now);
    store.upsert(&fact).unwrap();
    let mut state = ReviewState::fresh(&fact.id, now);
    state.phase = ReviewPhase::Review;
    state.consecutive_correct = 3;
    store.save_review_state(&state).unwrap();

    let collaborator = ScriptedCollaborator::new();
    collaborator
        .push_extraction(vec![CandidateFact::new(
            key("variance"),
            "Sample variance divides by n-1.",
        )])
        .push_similarity(0.7)
        .push_contradiction(true);
    let session = session_with(Arc::clone(&store), Box::new(collaborator));

    let report = session.teach_turn("is it n?", "actually n-1", now).unwrap();
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.label, "update");
    assert!(outcome.diff.is_some());

    let active = store.get_active(&key("variance")).unwrap().unwrap();
    assert_eq!(active.version, 2);
    assert_eq!(active.content, "Sample variance divides by n-1.");

    // Review history moved to the successor; the old binding is gone.
    let carried = store.get_review_state(&active.id).unwrap().unwrap();
    assert_eq!(carried.consecutive_correct, 3);
    assert_eq!(carried.phase, ReviewPhase::Review);
    assert!(store.get_review_state(&fact.id).unwrap().is_none());
}

#[test]
fn extraction_failure_degrades_but_still_logs_the_exchange() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let session = session_with(Arc::clone(&store), Box::new(FailingCollaborator));
    let now = Utc::now();

    let report = session.teach_turn("hello", "hi", now).unwrap();
    assert!(report.degraded);
    assert!(report.outcomes.is_empty());
    assert_eq!(store.degradation_count("session.extract").unwrap(), 1);
    assert_eq!(store.recent_interactions(10).unwrap().len(), 2);
}

#[test]
fn merge_degradation_is_written_to_the_audit_log() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let now = Utc::now();
    store
        .upsert(&Fact::new(key("mode"), "most frequent value", now))
        .unwrap();

    // Extraction succeeds but similarity scoring fails: the candidate
    // must still be kept (fail-open) as a new version.
    struct ExtractOnly;
    impl ICollaborator for ExtractOnly {
        fn extract_facts(
            &self,
            _t: &[engram_core::fact::Interaction],
        ) -> Result<Vec<CandidateFact>, engram_core::errors::CollaboratorError> {
            Ok(vec![CandidateFact::new(
                ConceptKey::normalize("mode"),
                "the value that appears most often",
            )])
        }
        fn score_similarity(
            &self,
            _a: &str,
            _b: &str,
        ) -> Result<f64, engram_core::errors::CollaboratorError> {
            Err(engram_core::errors::CollaboratorError::Unavailable {
                provider: "flaky".to_string(),
            })
        }
        fn detect_contradiction(
            &self,
            _s: &str,
            _c: &str,
        ) -> Result<bool, engram_core::errors::CollaboratorError> {
            Err(engram_core::errors::CollaboratorError::Unavailable {
                provider: "flaky".to_string(),
            })
        }
        fn generate_question(
            &self,
            _f: &Fact,
        ) -> Result<String, engram_core::errors::CollaboratorError> {
            Err(engram_core::errors::CollaboratorError::Unavailable {
                provider: "flaky".to_string(),
            })
        }
        fn grade_answer(
            &self,
            _f: &Fact,
            _q: &str,
            _a: &str,
        ) -> Result<engram_core::fact::Graded, engram_core::errors::CollaboratorError> {
            Err(engram_core::errors::CollaboratorError::Unavailable {
                provider: "flaky".to_string(),
            })
        }
        fn name(&self) -> &str {
            "flaky"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    let session = session_with(Arc::clone(&store), Box::new(ExtractOnly));
    let report = session.teach_turn("mode?", "most frequent", now).unwrap();

    assert!(report.degraded);
    assert_eq!(report.outcomes[0].label, "new");
    assert_eq!(store.degradation_count("merge").unwrap(), 1);
    // Fail-open supersession: information kept, invariant intact.
    let active = store.get_active(&key("mode")).unwrap().unwrap();
    assert_eq!(active.content, "the value that appears most often");
    assert_eq!(active.version, 2);
}

// ── Test mode ─────────────────────────────────────────────────────────────

fn seed_due_fact(store: &StoreEngine, concept: &str, content: &str) -> Fact {
    let now = Utc::now();
    let fact = Fact::new(ConceptKey::normalize(concept), content, now);
    store.upsert(&fact).unwrap();
    let mut state = ReviewState::fresh(&fact.id, now);
    state.due_at = now - Duration::days(1);
    store.save_review_state(&state).unwrap();
    fact
}

#[test]
fn quiz_round_trip_grades_and_records_the_outcome() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let fact = seed_due_fact(&store, "mean", "The mean is the average.");

    let collaborator = ScriptedCollaborator::new();
    collaborator
        .push_question("What does the mean measure?")
        .push_grade(true, "exactly right");
    let session = session_with(Arc::clone(&store), Box::new(collaborator));
    let now = Utc::now();

    let quiz = session.next_quiz(now).unwrap().expect("a fact is due");
    assert_eq!(quiz.fact_id, fact.id);
    assert_eq!(quiz.question, "What does the mean measure?");

    let report = session
        .submit_answer(&quiz, "central tendency", Duration::seconds(10), now)
        .unwrap();
    let graded = report.graded.unwrap();
    assert!(graded.correct);
    assert_eq!(graded.feedback, "exactly right");

    let review = report.review.unwrap();
    assert_eq!(review.phase, ReviewPhase::Learning);
    assert_eq!(review.consecutive_correct, 1);
    assert!(review.due_at > now);

    // The answer went into the interaction log, tagged with the fact.
    let log = store.recent_interactions(10).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].derived_fact_ids, vec![fact.id]);
}

#[test]
fn nothing_due_means_no_quiz() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let session = session_with(
        Arc::clone(&store),
        Box::new(ScriptedCollaborator::new()),
    );
    assert!(session.next_quiz(Utc::now()).unwrap().is_none());
}

#[test]
fn question_generation_failure_skips_the_quiz_gracefully() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    seed_due_fact(&store, "median", "middle value");
    let session = session_with(Arc::clone(&store), Box::new(FailingCollaborator));

    let quiz = session.next_quiz(Utc::now()).unwrap();
    assert!(quiz.is_none());
    assert_eq!(store.degradation_count("session.quiz").unwrap(), 1);
}

#[test]
fn grading_failure_records_nothing() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let fact = seed_due_fact(&store, "mode", "most frequent");

    let collaborator = ScriptedCollaborator::new();
    collaborator.push_question("What is the mode?");
    collaborator.fail_grading();
    let session = session_with(Arc::clone(&store), Box::new(collaborator));
    let now = Utc::now();

    let quiz = session.next_quiz(now).unwrap().unwrap();
    let report = session
        .submit_answer(&quiz, "the most frequent value", Duration::seconds(5), now)
        .unwrap();

    assert!(report.degraded);
    assert!(report.graded.is_none());
    assert!(report.review.is_none());
    assert_eq!(store.degradation_count("session.grade").unwrap(), 1);

    // The review state was not touched.
    let state = store.get_review_state(&fact.id).unwrap().unwrap();
    assert_eq!(state.phase, ReviewPhase::New);
    assert!(state.last_tested_at.is_none());
}

#[test]
fn answer_outcome_is_retried_against_the_successor_after_a_supersession() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let fact = seed_due_fact(&store, "variance", "divide by n");

    let collaborator = ScriptedCollaborator::new();
    collaborator
        .push_question("How is variance computed?")
        .push_grade(true, "right");
    let session = session_with(Arc::clone(&store), Box::new(collaborator));
    let now = Utc::now();

    let quiz = session.next_quiz(now).unwrap().unwrap();

    // Between question and answer, the fact gets superseded and its
    // review state rebound, as a concurrent teach turn would do.
    let successor = fact.successor("divide by n-1", now);
    store.supersede(&fact.id, &successor, fact.version).unwrap();
    let prior = store.get_review_state(&fact.id).unwrap().unwrap();
    store
        .save_review_state(&prior.carried_to(&successor.id))
        .unwrap();
    store.delete_review_state(&fact.id).unwrap();

    // Reread-then-reapply resolves the stale quiz against the successor.
    let report = session
        .submit_answer(&quiz, "sample variance uses n-1", Duration::seconds(8), now)
        .unwrap();
    let review = report.review.unwrap();
    assert_eq!(review.fact_id, successor.id);
    assert_eq!(review.consecutive_correct, 1);
}
