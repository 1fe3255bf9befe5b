//! Group conflict repository

use super::{RepoError, RepoResult};
use crate::seating::storage::SeatingStorage;
use shared::models::GroupConflict;

pub struct ConflictRepository {
    storage: SeatingStorage,
}

impl ConflictRepository {
    pub fn new(storage: SeatingStorage) -> Self {
        Self { storage }
    }

    pub fn list(&self, event_id: &str) -> RepoResult<Vec<GroupConflict>> {
        Ok(self.storage.conflicts(event_id)?)
    }

    pub fn create(&self, event_id: &str, a: &str, b: &str) -> RepoResult<GroupConflict> {
        if a == b {
            return Err(RepoError::Validation(
                "A group cannot conflict with itself".into(),
            ));
        }
        if self
            .storage
            .conflict_pairs(event_id)?
            .contains(&(a.to_string(), b.to_string()))
        {
            return Err(RepoError::Duplicate(format!(
                "Groups {a} and {b} are already in conflict"
            )));
        }
        self.storage.add_conflict(event_id, a, b)?;
        let (group_a, group_b) = if a < b { (a, b) } else { (b, a) };
        Ok(GroupConflict {
            event_id: event_id.to_string(),
            group_a: group_a.to_string(),
            group_b: group_b.to_string(),
        })
    }

    pub fn delete(&self, event_id: &str, a: &str, b: &str) -> RepoResult<bool> {
        if !self.storage.remove_conflict(event_id, a, b)? {
            return Err(RepoError::NotFound(format!(
                "Groups {a} and {b} are not in conflict"
            )));
        }
        Ok(true)
    }
}
