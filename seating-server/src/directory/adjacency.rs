//! Table adjacency repository

use super::{RepoError, RepoResult};
use crate::seating::storage::SeatingStorage;
use shared::models::{AdjacencyCreate, TableAdjacency};

pub struct AdjacencyRepository {
    storage: SeatingStorage,
}

impl AdjacencyRepository {
    pub fn new(storage: SeatingStorage) -> Self {
        Self { storage }
    }

    pub fn list(&self, event_id: &str) -> RepoResult<Vec<TableAdjacency>> {
        Ok(self.storage.adjacencies(event_id)?)
    }

    pub fn create(&self, event_id: &str, payload: AdjacencyCreate) -> RepoResult<TableAdjacency> {
        let (a, b) = (payload.table_a, payload.table_b);
        if a == b {
            return Err(RepoError::Validation(
                "A table cannot be adjacent to itself".into(),
            ));
        }
        for number in [a, b] {
            if self.storage.get_table(event_id, number)?.is_none() {
                return Err(RepoError::NotFound(format!("Table not found: {number}")));
            }
        }
        if self.storage.adjacency_pairs(event_id)?.contains(&(a, b)) {
            return Err(RepoError::Duplicate(format!(
                "Tables {a} and {b} are already adjacent"
            )));
        }
        self.storage.add_adjacency(event_id, a, b)?;
        Ok(TableAdjacency {
            event_id: event_id.to_string(),
            table_a: a.min(b),
            table_b: a.max(b),
        })
    }

    pub fn delete(&self, event_id: &str, a: u32, b: u32) -> RepoResult<bool> {
        if !self.storage.remove_adjacency(event_id, a, b)? {
            return Err(RepoError::NotFound(format!(
                "Tables {a} and {b} are not adjacent"
            )));
        }
        Ok(true)
    }
}
