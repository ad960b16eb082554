//! Candidate classification against the active fact for a concept.

use engram_core::config::MergeConfig;
use engram_core::errors::CollaboratorError;
use engram_core::fact::{CandidateFact, Fact};
use engram_core::traits::ICollaborator;
use tracing::{debug, warn};

use crate::diff::{DiffKind, DiffSummary};

/// Component name used in degradation records.
pub const COMPONENT: &str = "merge";

/// How a candidate relates to the stored active fact.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No active fact, or the candidate is distinct enough to stand alone.
    New,
    /// The candidate restates what is already stored.
    Duplicate,
    /// The candidate should supersede the stored fact.
    Update(DiffSummary),
}

impl Classification {
    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::New => "new",
            Classification::Duplicate => "duplicate",
            Classification::Update(_) => "update",
        }
    }
}

/// A fail-open fallback taken during classification, for the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    pub failure: String,
    pub fallback: String,
}

/// Classification result plus any degradation that occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOutcome {
    pub classification: Classification,
    pub degradation: Option<Degradation>,
}

impl ClassifyOutcome {
    fn clean(classification: Classification) -> Self {
        Self {
            classification,
            degradation: None,
        }
    }

    fn degraded(failure: &CollaboratorError) -> Self {
        Self {
            classification: Classification::New,
            degradation: Some(Degradation {
                failure: failure.to_string(),
                fallback: "classified as new".to_string(),
            }),
        }
    }
}

/// The dedup/merge engine. Stateless apart from its thresholds; the
/// collaborator is passed per call so sessions own the provider.
pub struct MergeEngine {
    config: MergeConfig,
}

impl MergeEngine {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Classify a candidate against the active fact for its concept.
    ///
    /// Never fails: collaborator errors degrade to `New`, retaining the
    /// candidate rather than dropping it, with the degradation reported
    /// for audit logging.
    pub fn classify(
        &self,
        collaborator: &dyn ICollaborator,
        candidate: &CandidateFact,
        existing: Option<&Fact>,
    ) -> ClassifyOutcome {
        let Some(existing) = existing else {
            return ClassifyOutcome::clean(Classification::New);
        };

        // Identical content needs no collaborator round-trip. This also
        // makes classification idempotent regardless of provider noise.
        if Fact::compute_content_hash(&candidate.content) == existing.content_hash {
            return ClassifyOutcome::clean(Classification::Duplicate);
        }

        let similarity =
            match collaborator.score_similarity(&existing.content, &candidate.content) {
                Ok(s) => s.clamp(0.0, 1.0),
                Err(e) => {
                    warn!(component = COMPONENT, error = %e, "similarity scoring failed, degrading to new");
                    return ClassifyOutcome::degraded(&e);
                }
            };

        if similarity < self.config.novelty_threshold {
            debug!(
                concept = %candidate.concept_key,
                similarity,
                "below novelty threshold"
            );
            return ClassifyOutcome::clean(Classification::New);
        }

        let contradicts =
            match collaborator.detect_contradiction(&existing.content, &candidate.content) {
                Ok(c) => c,
                Err(e) => {
                    warn!(component = COMPONENT, error = %e, "contradiction check failed, degrading to new");
                    return ClassifyOutcome::degraded(&e);
                }
            };

        let classification = if contradicts {
            Classification::Update(DiffSummary::build(
                DiffKind::Contradiction,
                &existing.content,
                &candidate.content,
            ))
        } else if similarity >= self.config.duplicate_threshold {
            Classification::Duplicate
        } else {
            // Moderate similarity, no contradiction: the candidate adds
            // information on the same concept, so supersede rather than
            // discard.
            Classification::Update(DiffSummary::build(
                DiffKind::Refinement,
                &existing.content,
                &candidate.content,
            ))
        };

        debug!(
            concept = %candidate.concept_key,
            similarity,
            contradicts,
            classification = classification.label(),
            "classified candidate"
        );
        ClassifyOutcome::clean(classification)
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}
