//! # engram-core
//!
//! Foundation crate for the Engram spaced-repetition memory engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod fact;
pub mod review;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::EngramConfig;
pub use errors::{EngramError, EngramResult};
pub use fact::{CandidateFact, ConceptKey, Fact, Graded, Interaction, Role};
pub use review::{EaseFactor, ReviewPhase, ReviewState, Strength};
