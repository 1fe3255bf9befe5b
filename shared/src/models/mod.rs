//! Data Models

// Guests
pub mod guest;

// Tables and layout
pub mod adjacency;
pub mod seating_table;

// Seating
pub mod group_conflict;
pub mod group_priority;
pub mod seat_assignment;
pub mod settings;

// Re-exports
pub use adjacency::{AdjacencyCreate, TableAdjacency};
pub use group_conflict::{ConflictCreate, GroupConflict};
pub use group_priority::GroupPriority;
pub use guest::{Guest, GuestCreate, GuestUpdate, RsvpStatus};
pub use seat_assignment::{AssignmentTrack, SeatAssignment};
pub use seating_table::{SeatingTable, SeatingTableCreate, SeatingTableUpdate, TableOrigin, TableType};
pub use settings::{
    AdjacencyPolicy, AutoRecalcPolicy, SeatingMode, SeatingSettings, SeatingSettingsUpdate,
};
