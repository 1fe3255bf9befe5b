//! Shared types for the seating engine
//!
//! Pure data models exchanged between the seating server and the
//! surrounding event-planning application: guests, tables, the seat
//! ledger, adjacency edges, priorities, conflicts, and settings.

pub mod models;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    AdjacencyCreate, AssignmentTrack, AutoRecalcPolicy, AdjacencyPolicy, Guest, GuestCreate,
    GuestUpdate, GroupConflict, GroupPriority, RsvpStatus, SeatAssignment, SeatingMode,
    SeatingSettings, SeatingSettingsUpdate, SeatingTable, SeatingTableCreate, SeatingTableUpdate,
    TableAdjacency, TableOrigin, TableType,
};
pub use types::Timestamp;
