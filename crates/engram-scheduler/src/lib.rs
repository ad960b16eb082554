//! # engram-scheduler
//!
//! Spaced-repetition core. Drives each fact through the
//! New → Learning → Review → Mastered lifecycle, growing review
//! intervals exponentially by a per-fact ease factor and regressing to
//! Learning on any incorrect answer.

pub mod engine;
pub mod formula;

pub use engine::{DueFact, Scheduler};
