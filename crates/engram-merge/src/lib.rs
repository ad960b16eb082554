//! # engram-merge
//!
//! Dedup/merge engine. Reconciles candidate facts against the store's
//! active fact for the same concept: new, duplicate, or update. The
//! similarity and contradiction judgments come from the collaborator;
//! collaborator failure degrades fail-open to `New` so information is
//! never silently dropped.

pub mod classifier;
pub mod diff;

pub use classifier::{Classification, ClassifyOutcome, Degradation, MergeEngine};
pub use diff::{DiffKind, DiffSummary};
