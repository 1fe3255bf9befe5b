//! Seating Assignment Engine
//!
//! Places guest groups into physical tables under hard and soft
//! constraints, across two independently persisted tracks:
//!
//! - **snapshot**: constraint model — assembles the per-event input
//! - **separation**: which groups must be kept apart (policy seam)
//! - **packing**: pure placement algorithm (no I/O)
//! - **storage**: redb-backed seat ledger and table/guest directories
//! - **manager**: recalculation coordinator and boundary operations
//!
//! # Data Flow
//!
//! ```text
//! RSVP change / repack request → SeatingManager
//!         ↓
//!   ConstraintSnapshot (read)
//!         ↓
//!   pack() → PlacementPlan (pure)
//!         ↓
//!   SeatingStorage::apply_plan (one transaction)
//!         ↓
//!   Broadcast to subscribers
//! ```
//!
//! A failed pack persists nothing: all writes happen in `apply_plan`
//! after a complete plan exists.

pub mod manager;
pub mod packing;
pub mod separation;
pub mod snapshot;
pub mod storage;

pub use manager::{
    PlacementSummary, RecalcOutcome, RecalcState, SeatingChange, SeatingChangeKind, SeatingManager,
};
pub use packing::{PackingError, PackingWarning, PlacementPlan, pack};
pub use separation::{AllFamiliesApart, ExplicitConflicts, SeparationPolicy};
pub use snapshot::{ConstraintSnapshot, GroupMember, GuestGroup};
pub use storage::{OccupantSeats, SeatingStorage, StorageError, TableWithOccupants};

use thiserror::Error;

/// Engine-level errors surfaced across the boundary
#[derive(Debug, Error)]
pub enum SeatingError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lock forces infeasibility; nothing was persisted
    #[error("Table {table} over capacity: required {required}, available {available}")]
    OverCapacity {
        table: u32,
        required: u32,
        available: u32,
    },

    #[error("No simulation data to promote")]
    NoSimulationData,

    #[error("Seating mode is manual; automatic placement is disabled")]
    ManualMode,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<PackingError> for SeatingError {
    fn from(err: PackingError) -> Self {
        match err {
            PackingError::OverCapacity {
                table,
                required,
                available,
            } => SeatingError::OverCapacity {
                table,
                required,
                available,
            },
        }
    }
}

/// Result type for engine operations
pub type SeatingResult<T> = Result<T, SeatingError>;
