//! Error types for the Engram workspace.
//!
//! Subsystem errors live in their own modules; `EngramError` aggregates
//! them so call sites can use a single `EngramResult<T>` alias.

mod collaborator_error;
mod storage_error;

pub use collaborator_error::CollaboratorError;
pub use storage_error::StorageError;

/// The aggregate error type used across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("unknown fact: {fact_id}")]
    UnknownFact { fact_id: String },

    #[error(
        "stale write for concept '{concept_key}': expected version {expected}, found {found}"
    )]
    Conflict {
        concept_key: String,
        expected: u32,
        found: u32,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Result alias used across the workspace.
pub type EngramResult<T> = Result<T, EngramError>;

impl EngramError {
    /// True when the error is recoverable by the orchestrator's
    /// reread-then-reapply retry (stale version or missing review state).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngramError::Conflict { .. } | EngramError::UnknownFact { .. }
        )
    }
}
