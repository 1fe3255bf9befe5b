//! Seat Assignment Model

use serde::{Deserialize, Serialize};

/// Assignment track enum
///
/// Two parallel, independently persisted plans exist per event: the
/// committed `Real` plan and the disposable `Simulation` draft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentTrack {
    Real,
    Simulation,
}

impl AssignmentTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentTrack::Real => "real",
            AssignmentTrack::Simulation => "simulation",
        }
    }
}

/// Seat ledger entry
///
/// One row per (event, track, guest); a guest sits at exactly one table per
/// track. Ledger rows carry the authoritative seat counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatAssignment {
    pub event_id: String,
    pub table_number: u32,
    pub guest_id: String,
    pub track: AssignmentTrack,
    pub seats: u32,
}
