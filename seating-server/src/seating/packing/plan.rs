//! Placement plan types
//!
//! The packing algorithm's output: a complete description of where every
//! group sits, which auto tables must be created, and which soft
//! constraints were traded away. Nothing here touches storage.

use serde::{Deserialize, Serialize};
use shared::models::TableType;
use std::collections::BTreeSet;
use thiserror::Error;

/// One member's seats within a placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberSeat {
    pub guest_id: String,
    pub seats: u32,
}

/// A group (or group fragment) placed at one table
///
/// A group may appear more than once when a locked table holds part of it;
/// the seat ledger is per guest, so fragments are well-defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupPlacement {
    pub group_key: String,
    pub table_number: u32,
    pub members: Vec<MemberSeat>,
}

impl GroupPlacement {
    pub fn seats(&self) -> u32 {
        self.members.iter().map(|m| m.seats).sum()
    }
}

/// An auto-origin table the plan requires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedTable {
    pub number: u32,
    pub capacity: u32,
    pub table_type: TableType,
}

/// Soft-constraint violations, reported but not fatal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackingWarning {
    /// Seats at a table exceed its capacity without a lock being involved
    OverCapacity {
        table: u32,
        capacity: u32,
        seated: u32,
    },
    /// Conflicting groups at adjacent tables, accepted under the relaxed
    /// adjacency policy
    AdjacentConflict {
        table_a: u32,
        table_b: u32,
        group_a: String,
        group_b: String,
    },
}

/// Complete placement plan for one event and track
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementPlan {
    pub placements: Vec<GroupPlacement>,
    pub new_tables: Vec<PlannedTable>,
    pub warnings: Vec<PackingWarning>,
}

impl PlacementPlan {
    /// All table numbers the plan seats anyone at or creates
    pub fn table_numbers(&self) -> BTreeSet<u32> {
        let mut numbers: BTreeSet<u32> =
            self.placements.iter().map(|p| p.table_number).collect();
        numbers.extend(self.new_tables.iter().map(|t| t.number));
        numbers
    }

    /// Distinct group keys placed
    pub fn group_keys(&self) -> BTreeSet<&str> {
        self.placements.iter().map(|p| p.group_key.as_str()).collect()
    }

    /// Total seats placed at one table
    pub fn seats_at(&self, table: u32) -> u32 {
        self.placements
            .iter()
            .filter(|p| p.table_number == table)
            .map(|p| p.seats())
            .sum()
    }

    /// Table number a group was placed at (first fragment)
    pub fn table_of(&self, group_key: &str) -> Option<u32> {
        self.placements
            .iter()
            .find(|p| p.group_key == group_key)
            .map(|p| p.table_number)
    }
}

/// Hard packing failures
///
/// Only lock-forced infeasibility is fatal; every other capacity problem
/// is allow-but-warn.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PackingError {
    #[error("table {table} over capacity: required {required}, available {available}")]
    OverCapacity {
        table: u32,
        required: u32,
        available: u32,
    },
}
