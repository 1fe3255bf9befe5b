//! Group priority repository

use super::{RepoError, RepoResult};
use crate::seating::storage::SeatingStorage;
use shared::models::GroupPriority;

pub struct PriorityRepository {
    storage: SeatingStorage,
}

impl PriorityRepository {
    pub fn new(storage: SeatingStorage) -> Self {
        Self { storage }
    }

    /// Ranked groups only, in priority order
    pub fn list(&self, event_id: &str) -> RepoResult<Vec<GroupPriority>> {
        let mut priorities: Vec<GroupPriority> = self
            .storage
            .priorities(event_id)?
            .into_iter()
            .map(|(group_key, priority)| GroupPriority {
                event_id: event_id.to_string(),
                group_key,
                priority,
            })
            .collect();
        priorities.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.group_key.cmp(&b.group_key))
        });
        Ok(priorities)
    }

    /// Rank a group; 0 removes the ranking. A nonzero priority already
    /// held by another group demotes that group to unranked.
    pub fn set(&self, event_id: &str, group_key: &str, priority: u32) -> RepoResult<GroupPriority> {
        let known = self
            .storage
            .guests(event_id)?
            .iter()
            .any(|g| g.group_key() == group_key);
        if !known {
            return Err(RepoError::NotFound(format!("Group not found: {group_key}")));
        }
        self.storage.set_priority(event_id, group_key, priority)?;
        Ok(GroupPriority {
            event_id: event_id.to_string(),
            group_key: group_key.to_string(),
            priority,
        })
    }
}
