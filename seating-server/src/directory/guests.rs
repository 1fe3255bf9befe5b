//! Guest repository

use super::{RepoError, RepoResult};
use crate::seating::storage::SeatingStorage;
use shared::models::{Guest, GuestCreate, GuestUpdate, RsvpStatus};

pub struct GuestRepository {
    storage: SeatingStorage,
}

impl GuestRepository {
    pub fn new(storage: SeatingStorage) -> Self {
        Self { storage }
    }

    pub fn list(&self, event_id: &str) -> RepoResult<Vec<Guest>> {
        let mut guests = self.storage.guests(event_id)?;
        guests.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(guests)
    }

    pub fn get(&self, event_id: &str, guest_id: &str) -> RepoResult<Guest> {
        self.storage
            .get_guest(event_id, guest_id)?
            .ok_or_else(|| RepoError::NotFound(format!("Guest not found: {guest_id}")))
    }

    pub fn create(&self, event_id: &str, payload: GuestCreate) -> RepoResult<Guest> {
        if payload.name.trim().is_empty() {
            return Err(RepoError::Validation("Guest name must not be empty".into()));
        }
        let guest = Guest {
            id: uuid::Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            name: payload.name,
            family_group: payload.family_group,
            adults: payload.adults.unwrap_or(1),
            children: payload.children.unwrap_or(0),
            age: payload.age,
            rsvp: payload.rsvp.unwrap_or(RsvpStatus::Pending),
            locked_seat: false,
            locked_table: None,
            table_number: None,
        };
        self.storage.put_guest(&guest)?;
        Ok(guest)
    }

    pub fn update(&self, event_id: &str, guest_id: &str, payload: GuestUpdate) -> RepoResult<Guest> {
        let mut guest = self.get(event_id, guest_id)?;
        if let Some(name) = payload.name {
            if name.trim().is_empty() {
                return Err(RepoError::Validation("Guest name must not be empty".into()));
            }
            guest.name = name;
        }
        if let Some(family_group) = payload.family_group {
            guest.family_group = family_group;
        }
        if let Some(adults) = payload.adults {
            guest.adults = adults;
        }
        if let Some(children) = payload.children {
            guest.children = children;
        }
        if let Some(age) = payload.age {
            guest.age = age;
        }
        if let Some(rsvp) = payload.rsvp {
            guest.rsvp = rsvp;
        }
        if let Some(locked_seat) = payload.locked_seat {
            guest.locked_seat = locked_seat;
        }
        if let Some(locked_table) = payload.locked_table {
            guest.locked_table = locked_table;
        }
        self.storage.put_guest(&guest)?;
        Ok(guest)
    }

    /// Persist an RSVP change; the caller decides whether it triggers a
    /// recalculation
    pub fn set_rsvp(&self, event_id: &str, guest_id: &str, rsvp: RsvpStatus) -> RepoResult<Guest> {
        let mut guest = self.get(event_id, guest_id)?;
        guest.rsvp = rsvp;
        self.storage.put_guest(&guest)?;
        Ok(guest)
    }

    pub fn delete(&self, event_id: &str, guest_id: &str) -> RepoResult<bool> {
        if !self.storage.delete_guest(event_id, guest_id)? {
            return Err(RepoError::NotFound(format!("Guest not found: {guest_id}")));
        }
        Ok(true)
    }
}
