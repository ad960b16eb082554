//! # engram-session
//!
//! Session orchestrator. Composes the fact store, dedup/merge engine,
//! and scheduler to serve teach turns (ingest + reconcile) and test
//! turns (quiz + grade + record), delegating natural-language work to
//! the collaborator. Collaborator failures degrade fail-open; conflicts
//! are retried once by rereading; persistence failures abort the turn
//! only.

pub mod orchestrator;
pub mod report;
pub mod telemetry;

pub use orchestrator::TutorSession;
pub use report::{AnswerReport, CandidateOutcome, QuizItem, TeachReport};
