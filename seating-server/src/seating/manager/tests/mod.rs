//! Manager test suite
//!
//! Everything runs against in-memory storage; each test builds its own
//! event from scratch.

mod test_packing;
mod test_settings;
mod test_tracks;

use super::*;
use crate::seating::storage::SeatingStorage;
use shared::models::{
    Guest, RsvpStatus, SeatingTable, TableOrigin, TableType,
};
use std::collections::BTreeMap;

pub(super) fn manager() -> SeatingManager {
    SeatingManager::new(SeatingStorage::open_in_memory().unwrap())
}

pub(super) fn guest(
    event: &str,
    id: &str,
    family: Option<&str>,
    adults: u32,
    children: u32,
) -> Guest {
    Guest {
        id: id.to_string(),
        event_id: event.to_string(),
        name: format!("Guest {id}"),
        family_group: family.map(str::to_string),
        adults,
        children,
        age: None,
        rsvp: RsvpStatus::Confirmed,
        locked_seat: false,
        locked_table: None,
        table_number: None,
    }
}

/// A child guest: zero adults, one child seat, with an age
pub(super) fn kid(event: &str, id: &str, age: u32) -> Guest {
    Guest {
        age: Some(age),
        ..guest(event, id, None, 0, 1)
    }
}

pub(super) fn table(event: &str, number: u32, capacity: u32) -> SeatingTable {
    SeatingTable {
        event_id: event.to_string(),
        number,
        capacity,
        table_type: TableType::Mixed,
        origin: TableOrigin::Manual,
        locked: false,
        occupants: Vec::new(),
    }
}

/// Seats per non-empty table, from the read projection
pub(super) fn seats_by_table(
    manager: &SeatingManager,
    event: &str,
    track: AssignmentTrack,
) -> BTreeMap<u32, u32> {
    manager
        .assignments(event, track)
        .unwrap()
        .into_iter()
        .filter(|t| !t.occupants.is_empty())
        .map(|t| (t.number, t.seats_total))
        .collect()
}

/// Which table a guest sits at on a track, per the ledger
pub(super) fn table_of(
    manager: &SeatingManager,
    event: &str,
    track: AssignmentTrack,
    guest_id: &str,
) -> Option<u32> {
    manager
        .storage()
        .ledger(event, track)
        .unwrap()
        .into_iter()
        .find(|row| row.guest_id == guest_id)
        .map(|row| row.table_number)
}
