//! Seating Table Model

use serde::{Deserialize, Serialize};

/// Table type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    Adults,
    Kids,
    Mixed,
}

/// Table origin enum
///
/// Auto tables are engine-owned and may be deleted or recreated during a
/// repack; manual tables are user-owned and the engine never deletes or
/// resizes them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableOrigin {
    Manual,
    Auto,
}

/// Seating table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatingTable {
    pub event_id: String,
    /// Table number, unique per event
    pub number: u32,
    pub capacity: u32,
    pub table_type: TableType,
    pub origin: TableOrigin,
    /// A locked table's contents are never altered by a recalculation
    pub locked: bool,
    /// Denormalized guest-id cache for the real track; may hold duplicates,
    /// deduplicated on read. The seat ledger is authoritative.
    pub occupants: Vec<String>,
}

impl SeatingTable {
    /// Occupant ids with duplicates collapsed, original order kept
    pub fn occupants_deduped(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.occupants.len());
        for id in &self.occupants {
            if !seen.contains(id) {
                seen.push(id.clone());
            }
        }
        seen
    }
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingTableCreate {
    pub number: u32,
    pub capacity: u32,
    pub table_type: Option<TableType>,
}

/// Update table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingTableUpdate {
    pub capacity: Option<u32>,
    pub table_type: Option<TableType>,
    pub locked: Option<bool>,
}
