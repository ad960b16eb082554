/// Storage-layer errors for SQLite operations.
///
/// These are fatal for the current operation: the orchestrator logs and
/// aborts the turn, leaving prior durable state intact.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}
