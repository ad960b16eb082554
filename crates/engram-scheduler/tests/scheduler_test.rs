//! Integration tests for the spaced-repetition state machine and due
//! ordering, against an in-memory store.

use chrono::{Duration, Utc};

use engram_core::config::SchedulerConfig;
use engram_core::fact::Fact;
use engram_core::review::{ReviewPhase, ReviewState};
use engram_core::traits::IFactStore;
use engram_core::EngramError;
use engram_scheduler::Scheduler;
use engram_store::StoreEngine;
use test_fixtures::fact;

const SLOW: i64 = 60; // seconds, above the fast-latency cutoff
const FAST: i64 = 5;

fn seed_fact(store: &StoreEngine, concept: &str) -> Fact {
    let fact = fact(concept, concept);
    store.upsert(&fact).unwrap();
    fact
}

// ── Lifecycle scenario ────────────────────────────────────────────────────

#[test]
fn mean_definition_scenario_follows_the_documented_path() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();
    let fact = seed_fact(&store, "mean definition");
    scheduler.init_state(&store, &fact.id, now).unwrap();

    // First test incorrect: Learning, interval = 1 day, streak reset.
    let state = scheduler
        .record_outcome(&store, &fact.id, false, Duration::seconds(SLOW), now)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Learning);
    assert_eq!(state.interval_days, 1.0);
    assert_eq!(state.consecutive_correct, 0);
    assert_eq!(state.due_at, now + Duration::days(1));

    // Two slow correct answers graduate to Review at 1 × 1.3 days.
    let now2 = now + Duration::days(1);
    let state = scheduler
        .record_outcome(&store, &fact.id, true, Duration::seconds(SLOW), now2)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Learning);
    assert_eq!(state.consecutive_correct, 1);
    assert_eq!(state.interval_days, 1.0);

    let now3 = now2 + Duration::days(1);
    let state = scheduler
        .record_outcome(&store, &fact.id, true, Duration::seconds(SLOW), now3)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Review);
    assert!((state.interval_days - 1.3).abs() < 1e-9);

    // Next slow correct multiplies by the ease factor again.
    let now4 = now3 + Duration::days(2);
    let state = scheduler
        .record_outcome(&store, &fact.id, true, Duration::seconds(SLOW), now4)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Review);
    assert!((state.interval_days - 1.69).abs() < 1e-9);
}

#[test]
fn fast_correct_rewards_ease_before_growing_the_interval() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();
    let fact = seed_fact(&store, "variance");

    let mut state = ReviewState::fresh(&fact.id, now);
    state.phase = ReviewPhase::Review;
    state.interval_days = 10.0;
    store.save_review_state(&state).unwrap();

    let state = scheduler
        .record_outcome(&store, &fact.id, true, Duration::seconds(FAST), now)
        .unwrap();
    // Ease moves 1.3 → 1.45 first, then the interval grows by it.
    assert!((state.ease_factor.value() - 1.45).abs() < 1e-9);
    assert!((state.interval_days - 14.5).abs() < 1e-9);
}

#[test]
fn incorrect_regresses_any_phase_to_learning() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();
    let fact = seed_fact(&store, "median");

    let mut state = ReviewState::fresh(&fact.id, now);
    state.phase = ReviewPhase::Review;
    state.interval_days = 20.0;
    state.consecutive_correct = 5;
    state.ease_factor = 2.0.into();
    state.strength = 8.0.into();
    store.save_review_state(&state).unwrap();

    let state = scheduler
        .record_outcome(&store, &fact.id, false, Duration::seconds(SLOW), now)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Learning);
    assert_eq!(state.consecutive_correct, 0);
    assert_eq!(state.interval_days, 1.0);
    assert_eq!(state.due_at, now + Duration::days(1));
    assert!((state.ease_factor.value() - 1.8).abs() < 1e-9);
    assert!((state.strength.value() - 4.0).abs() < 1e-9);
}

#[test]
fn long_intervals_with_a_streak_reach_mastered() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();
    let fact = seed_fact(&store, "clt");

    let mut state = ReviewState::fresh(&fact.id, now);
    state.phase = ReviewPhase::Review;
    state.interval_days = 80.0;
    state.consecutive_correct = 3;
    state.ease_factor = 1.3.into();
    store.save_review_state(&state).unwrap();

    // 80 × 1.3 = 104 days > 90-day ceiling, streak ≥ 3.
    let state = scheduler
        .record_outcome(&store, &fact.id, true, Duration::seconds(SLOW), now)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Mastered);
    assert!(state.interval_days > 90.0);
}

#[test]
fn mastery_needs_the_streak_not_just_the_interval() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();
    let fact = seed_fact(&store, "regression");

    let mut state = ReviewState::fresh(&fact.id, now);
    state.phase = ReviewPhase::Review;
    state.interval_days = 80.0;
    state.consecutive_correct = 1;
    state.ease_factor = 1.3.into();
    store.save_review_state(&state).unwrap();

    let state = scheduler
        .record_outcome(&store, &fact.id, true, Duration::seconds(SLOW), now)
        .unwrap();
    assert_eq!(state.phase, ReviewPhase::Review);
}

#[test]
fn unknown_fact_id_is_an_error() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();

    let err = scheduler
        .record_outcome(
            &store,
            "no-such-fact",
            true,
            Duration::seconds(SLOW),
            Utc::now(),
        )
        .unwrap_err();
    assert!(matches!(err, EngramError::UnknownFact { .. }));
}

// ── Due ordering ──────────────────────────────────────────────────────────

#[test]
fn next_due_facts_orders_by_overdueness_then_weakness() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();

    // (concept, overdue days, strength)
    for (concept, overdue, strength) in [
        ("slightly overdue", 1, 0.0),
        ("very overdue", 5, 3.0),
        ("tied weak", 3, 1.0),
        ("tied strong", 3, 9.0),
    ] {
        let fact = seed_fact(&store, concept);
        let mut state = ReviewState::fresh(&fact.id, now);
        state.due_at = now - Duration::days(overdue);
        state.strength = strength.into();
        store.save_review_state(&state).unwrap();
    }
    // Not yet due; must not appear.
    let future = seed_fact(&store, "future");
    let mut state = ReviewState::fresh(&future.id, now);
    state.due_at = now + Duration::days(2);
    store.save_review_state(&state).unwrap();

    let due = scheduler.next_due_facts(&store, now, 10).unwrap();
    let concepts: Vec<&str> = due.iter().map(|d| d.fact.content.as_str()).collect();
    assert_eq!(
        concepts,
        vec!["very overdue", "tied weak", "tied strong", "slightly overdue"]
    );

    // Overdue-ness is non-increasing across the sequence.
    for pair in due.windows(2) {
        assert!(pair[0].overdue_days >= pair[1].overdue_days);
    }

    // Limit truncates from the tail.
    let top = scheduler.next_due_facts(&store, now, 2).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].fact.content, "very overdue");
}

#[test]
fn superseded_facts_are_skipped_in_the_due_queue() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let now = Utc::now();

    let fact = seed_fact(&store, "outdated");
    let mut state = ReviewState::fresh(&fact.id, now);
    state.due_at = now - Duration::days(1);
    store.save_review_state(&state).unwrap();

    let successor = fact.successor("corrected", now);
    store.supersede(&fact.id, &successor, fact.version).unwrap();

    // The stale state still points at the superseded version.
    let due = scheduler.next_due_facts(&store, now, 10).unwrap();
    assert!(due.is_empty());
}

// ── Invariants ────────────────────────────────────────────────────────────

#[test]
fn correct_answers_never_shorten_the_interval() {
    let store = StoreEngine::open_in_memory().unwrap();
    let scheduler = Scheduler::default();
    let mut now = Utc::now();
    let fact = seed_fact(&store, "anova");
    scheduler.init_state(&store, &fact.id, now).unwrap();

    let mut previous_interval = 0.0;
    for _ in 0..12 {
        now += Duration::days(1);
        let state = scheduler
            .record_outcome(&store, &fact.id, true, Duration::seconds(SLOW), now)
            .unwrap();
        assert!(state.interval_days >= previous_interval);
        assert!(state.due_at >= now);
        assert!(state.is_consistent());
        previous_interval = state.interval_days;
    }
}
