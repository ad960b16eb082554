use crate::errors::CollaboratorError;
use crate::fact::{CandidateFact, Fact, Graded, Interaction};

/// Narrow contract for the external language-model collaborator.
///
/// One method per task (EXTRACT, SIMILARITY, CONTRADICTION,
/// GENERATE_QUESTION, GRADE). Every method can fail with
/// `CollaboratorError`; callers degrade fail-open rather than aborting
/// the session.
pub trait ICollaborator: Send + Sync {
    /// Extract candidate facts from a transcript window.
    fn extract_facts(
        &self,
        transcript: &[Interaction],
    ) -> Result<Vec<CandidateFact>, CollaboratorError>;

    /// Semantic similarity of two texts in [0.0, 1.0].
    fn score_similarity(&self, a: &str, b: &str) -> Result<f64, CollaboratorError>;

    /// Whether `candidate` states something inconsistent with `stored`.
    fn detect_contradiction(
        &self,
        stored: &str,
        candidate: &str,
    ) -> Result<bool, CollaboratorError>;

    /// Generate a quiz question testing understanding of a fact.
    fn generate_question(&self, fact: &Fact) -> Result<String, CollaboratorError>;

    /// Grade a learner's answer to a generated question.
    fn grade_answer(
        &self,
        fact: &Fact,
        question: &str,
        answer: &str,
    ) -> Result<Graded, CollaboratorError>;

    /// Provider name, for logs and degradation records.
    fn name(&self) -> &str;

    /// Whether the provider is currently reachable.
    fn is_available(&self) -> bool;
}
