//! Fact model: atomic knowledge items with versioned supersession chains.

mod base;
mod candidate;
mod concept_key;
mod interaction;

pub use base::Fact;
pub use candidate::{CandidateFact, Graded};
pub use concept_key::ConceptKey;
pub use interaction::{Interaction, Role};
