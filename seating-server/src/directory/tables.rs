//! Table repository
//!
//! Manages manual tables only; auto tables appear and disappear as the
//! engine applies plans.

use super::{RepoError, RepoResult};
use crate::seating::storage::SeatingStorage;
use shared::models::{SeatingTable, SeatingTableCreate, SeatingTableUpdate, TableOrigin, TableType};

pub struct TableRepository {
    storage: SeatingStorage,
}

impl TableRepository {
    pub fn new(storage: SeatingStorage) -> Self {
        Self { storage }
    }

    pub fn list(&self, event_id: &str) -> RepoResult<Vec<SeatingTable>> {
        Ok(self.storage.tables(event_id)?)
    }

    pub fn get(&self, event_id: &str, number: u32) -> RepoResult<SeatingTable> {
        self.storage
            .get_table(event_id, number)?
            .ok_or_else(|| RepoError::NotFound(format!("Table not found: {number}")))
    }

    pub fn create(&self, event_id: &str, payload: SeatingTableCreate) -> RepoResult<SeatingTable> {
        if payload.capacity == 0 {
            return Err(RepoError::Validation("Table capacity must be at least 1".into()));
        }
        if self.storage.get_table(event_id, payload.number)?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                payload.number
            )));
        }
        let table = SeatingTable {
            event_id: event_id.to_string(),
            number: payload.number,
            capacity: payload.capacity,
            table_type: payload.table_type.unwrap_or(TableType::Mixed),
            origin: TableOrigin::Manual,
            locked: false,
            occupants: Vec::new(),
        };
        self.storage.put_table(&table)?;
        Ok(table)
    }

    pub fn update(
        &self,
        event_id: &str,
        number: u32,
        payload: SeatingTableUpdate,
    ) -> RepoResult<SeatingTable> {
        let mut table = self.get(event_id, number)?;
        if let Some(capacity) = payload.capacity {
            if capacity == 0 {
                return Err(RepoError::Validation("Table capacity must be at least 1".into()));
            }
            table.capacity = capacity;
        }
        if let Some(table_type) = payload.table_type {
            table.table_type = table_type;
        }
        if let Some(locked) = payload.locked {
            table.locked = locked;
        }
        self.storage.put_table(&table)?;
        Ok(table)
    }

    /// Delete a table; guests seated there lose their ledger rows
    pub fn delete(&self, event_id: &str, number: u32) -> RepoResult<bool> {
        if !self.storage.delete_table(event_id, number)? {
            return Err(RepoError::NotFound(format!("Table not found: {number}")));
        }
        Ok(true)
    }
}
