//! Event directory: guests, tables, and their relations
//!
//! Thin repositories over [`SeatingStorage`](crate::seating::SeatingStorage)
//! for everything the engine reads but does not own: the guest list, the
//! table layout, adjacency edges, group priorities, and group conflicts.
//! Engine-owned state (ledger rows, occupant caches) is never written here.

pub mod adjacency;
pub mod conflicts;
pub mod guests;
pub mod priorities;
pub mod tables;

pub use adjacency::AdjacencyRepository;
pub use conflicts::ConflictRepository;
pub use guests::GuestRepository;
pub use priorities::PriorityRepository;
pub use tables::TableRepository;

use crate::seating::storage::StorageError;
use crate::utils::AppError;
use thiserror::Error;

/// Directory-level errors
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
