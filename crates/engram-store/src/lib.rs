//! # engram-store
//!
//! SQLite-backed fact store. Facts form versioned supersession chains
//! (never hard-deleted); review states and the append-only interaction
//! log live alongside them in the same database.

pub mod engine;
pub mod migrations;
pub mod pragmas;
pub mod queries;

pub use engine::StoreEngine;

use engram_core::errors::{EngramError, StorageError};

/// Wrap a low-level SQLite failure message into the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> EngramError {
    EngramError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}
