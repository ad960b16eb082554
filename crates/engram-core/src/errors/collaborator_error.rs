/// Errors from the external language-model collaborator.
///
/// Never fatal: callers degrade fail-open (treat the candidate as new,
/// skip quiz generation) and record the degradation.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("collaborator '{provider}' unreachable")]
    Unavailable { provider: String },

    #[error("malformed {task} response: {detail}")]
    MalformedResponse { task: String, detail: String },

    #[error("{task} call aborted")]
    Aborted { task: String },
}
