use serde::{Deserialize, Serialize};

use super::concept_key::ConceptKey;

/// A candidate fact extracted from a learning interaction, before the
/// dedup/merge engine has reconciled it against the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFact {
    pub concept_key: ConceptKey,
    pub content: String,
}

impl CandidateFact {
    pub fn new(concept_key: impl Into<ConceptKey>, content: impl Into<String>) -> Self {
        Self {
            concept_key: concept_key.into(),
            content: content.into(),
        }
    }
}

/// Grading verdict for a quiz answer, produced by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graded {
    pub correct: bool,
    pub feedback: String,
}
