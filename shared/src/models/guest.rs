//! Guest Model

use serde::{Deserialize, Serialize};

/// RSVP status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpStatus {
    Pending,
    Confirmed,
    Declined,
}

/// Guest entity
///
/// A guest record represents one invitation party: `adults` and `children`
/// count the people attending under this record. `family_group` is the
/// seating group key; guests without one form a singleton group keyed by
/// their own id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub name: String,
    /// Group key shared by guests seated together (None = own group)
    pub family_group: Option<String>,
    pub adults: u32,
    pub children: u32,
    /// Age in years, when known (drives the kids-table carve-out)
    pub age: Option<u32>,
    pub rsvp: RsvpStatus,
    /// When true the guest's group must stay at `locked_table`
    pub locked_seat: bool,
    pub locked_table: Option<u32>,
    /// Denormalized table number for the real track, engine-maintained
    pub table_number: Option<u32>,
}

impl Guest {
    /// The seating group key: family group name, or the guest id itself
    pub fn group_key(&self) -> &str {
        self.family_group.as_deref().unwrap_or(&self.id)
    }

    /// Confirmed attendance weight (adults + children)
    pub fn attendance(&self) -> u32 {
        self.adults + self.children
    }
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCreate {
    pub name: String,
    pub family_group: Option<String>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub age: Option<u32>,
    pub rsvp: Option<RsvpStatus>,
}

/// Update guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub family_group: Option<Option<String>>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub age: Option<Option<u32>>,
    pub rsvp: Option<RsvpStatus>,
    pub locked_seat: Option<bool>,
    pub locked_table: Option<Option<u32>>,
}
