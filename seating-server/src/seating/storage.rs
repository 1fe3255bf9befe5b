//! redb-based storage layer for the seating engine
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `guests` | `(event_id, guest_id)` | `Guest` | Guest directory |
//! | `tables` | `(event_id, number)` | `SeatingTable` | Table directory |
//! | `seat_ledger` | `(event_id, track, guest_id)` | `SeatAssignment` | Authoritative seat counts |
//! | `adjacency` | `(event_id, a, b)` | `()` | Adjacent table pairs (two directed rows) |
//! | `group_priorities` | `(event_id, group_key)` | `u32` | Placement order (absence = 0) |
//! | `group_conflicts` | `(event_id, a, b)` | `()` | Keep-apart pairs (two directed rows) |
//! | `settings` | `event_id` | `SeatingSettings` | Per-event singleton |
//!
//! The ledger key carries the track, so a guest can hold at most one row
//! per track by construction. `SeatingTable.occupants` is a derived cache
//! for the real track, rebuilt inside the same transaction that rewrites
//! ledger rows — never hand-maintained.

use crate::seating::packing::PlacementPlan;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{Deserialize, Serialize};
use shared::models::{
    AssignmentTrack, GroupConflict, Guest, RsvpStatus, SeatAssignment, SeatingSettings,
    SeatingTable, TableAdjacency, TableOrigin, TableType,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Guest directory: key = (event_id, guest_id), value = JSON Guest
const GUESTS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("guests");

/// Table directory: key = (event_id, table number), value = JSON SeatingTable
const TABLES_TABLE: TableDefinition<(&str, u32), &[u8]> = TableDefinition::new("tables");

/// Seat ledger: key = (event_id, track, guest_id), value = JSON SeatAssignment
const LEDGER_TABLE: TableDefinition<(&str, &str, &str), &[u8]> =
    TableDefinition::new("seat_ledger");

/// Adjacency edges: key = (event_id, table a, table b), stored both ways
const ADJACENCY_TABLE: TableDefinition<(&str, u32, u32), ()> = TableDefinition::new("adjacency");

/// Group priorities: key = (event_id, group key), value = nonzero priority
const PRIORITIES_TABLE: TableDefinition<(&str, &str), u32> =
    TableDefinition::new("group_priorities");

/// Group conflicts: key = (event_id, group a, group b), stored both ways
const CONFLICTS_TABLE: TableDefinition<(&str, &str, &str), ()> =
    TableDefinition::new("group_conflicts");

/// Settings singleton: key = event_id, value = JSON SeatingSettings
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One occupant of a table, with the seat count for the requested track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccupantSeats {
    pub guest_id: String,
    pub name: String,
    pub seats: u32,
}

/// Read projection: a table with its occupants, duplicates collapsed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableWithOccupants {
    pub number: u32,
    pub capacity: u32,
    pub table_type: TableType,
    pub origin: TableOrigin,
    pub locked: bool,
    pub occupants: Vec<OccupantSeats>,
    pub seats_total: u32,
}

/// Seating storage backed by redb
#[derive(Clone)]
pub struct SeatingStorage {
    db: Arc<Database>,
}

impl SeatingStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// In-memory storage for tests
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(GUESTS_TABLE)?;
            let _ = txn.open_table(TABLES_TABLE)?;
            let _ = txn.open_table(LEDGER_TABLE)?;
            let _ = txn.open_table(ADJACENCY_TABLE)?;
            let _ = txn.open_table(PRIORITIES_TABLE)?;
            let _ = txn.open_table(CONFLICTS_TABLE)?;
            let _ = txn.open_table(SETTINGS_TABLE)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========================================================================
    // Guest directory
    // ========================================================================

    pub fn guests(&self, event_id: &str) -> StorageResult<Vec<Guest>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(GUESTS_TABLE)?;
        let mut guests = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let (e, _id) = key.value();
            if e == event_id {
                guests.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(guests)
    }

    pub fn get_guest(&self, event_id: &str, guest_id: &str) -> StorageResult<Option<Guest>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(GUESTS_TABLE)?;
        match table.get((event_id, guest_id))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_guest(&self, guest: &Guest) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(GUESTS_TABLE)?;
            let bytes = serde_json::to_vec(guest)?;
            table.insert((guest.event_id.as_str(), guest.id.as_str()), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete a guest together with their ledger rows on both tracks
    pub fn delete_guest(&self, event_id: &str, guest_id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed;
        {
            let mut table = txn.open_table(GUESTS_TABLE)?;
            existed = table.remove((event_id, guest_id))?.is_some();
            let mut ledger = txn.open_table(LEDGER_TABLE)?;
            for track in [AssignmentTrack::Real, AssignmentTrack::Simulation] {
                ledger.remove((event_id, track.as_str(), guest_id))?;
            }
        }
        if existed {
            rebuild_real_caches(&txn, event_id)?;
        }
        txn.commit()?;
        Ok(existed)
    }

    // ========================================================================
    // Table directory
    // ========================================================================

    pub fn tables(&self, event_id: &str) -> StorageResult<Vec<SeatingTable>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TABLES_TABLE)?;
        let mut tables = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let (e, _n) = key.value();
            if e == event_id {
                tables.push(serde_json::from_slice(value.value())?);
            }
        }
        tables.sort_by_key(|t: &SeatingTable| t.number);
        Ok(tables)
    }

    pub fn get_table(&self, event_id: &str, number: u32) -> StorageResult<Option<SeatingTable>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TABLES_TABLE)?;
        match table.get((event_id, number))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_table(&self, seating_table: &SeatingTable) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TABLES_TABLE)?;
            let bytes = serde_json::to_vec(seating_table)?;
            table.insert(
                (seating_table.event_id.as_str(), seating_table.number),
                bytes.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete a table together with the ledger rows seated at it
    pub fn delete_table(&self, event_id: &str, number: u32) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed;
        {
            let mut table = txn.open_table(TABLES_TABLE)?;
            existed = table.remove((event_id, number))?.is_some();

            let mut ledger = txn.open_table(LEDGER_TABLE)?;
            let mut stale: Vec<(String, String)> = Vec::new();
            for entry in ledger.iter()? {
                let (key, value) = entry?;
                let (e, track, guest) = key.value();
                if e == event_id {
                    let row: SeatAssignment = serde_json::from_slice(value.value())?;
                    if row.table_number == number {
                        stale.push((track.to_string(), guest.to_string()));
                    }
                }
            }
            for (track, guest) in &stale {
                ledger.remove((event_id, track.as_str(), guest.as_str()))?;
            }
        }
        if existed {
            rebuild_real_caches(&txn, event_id)?;
        }
        txn.commit()?;
        Ok(existed)
    }

    // ========================================================================
    // Adjacency
    // ========================================================================

    /// Declare two tables adjacent (stores both directed rows)
    pub fn add_adjacency(&self, event_id: &str, a: u32, b: u32) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ADJACENCY_TABLE)?;
            table.insert((event_id, a, b), ())?;
            table.insert((event_id, b, a), ())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn remove_adjacency(&self, event_id: &str, a: u32, b: u32) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed;
        {
            let mut table = txn.open_table(ADJACENCY_TABLE)?;
            let first = table.remove((event_id, a, b))?.is_some();
            let second = table.remove((event_id, b, a))?.is_some();
            existed = first || second;
        }
        txn.commit()?;
        Ok(existed)
    }

    /// Normalized edges (a < b), for listing
    pub fn adjacencies(&self, event_id: &str) -> StorageResult<Vec<TableAdjacency>> {
        let pairs = self.adjacency_pairs(event_id)?;
        let mut edges: Vec<TableAdjacency> = pairs
            .into_iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| TableAdjacency {
                event_id: event_id.to_string(),
                table_a: a,
                table_b: b,
            })
            .collect();
        edges.sort_by_key(|e| (e.table_a, e.table_b));
        Ok(edges)
    }

    /// All directed pairs, for O(1) symmetric lookup
    pub fn adjacency_pairs(&self, event_id: &str) -> StorageResult<HashSet<(u32, u32)>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ADJACENCY_TABLE)?;
        let mut pairs = HashSet::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let (e, a, b) = key.value();
            if e == event_id {
                pairs.insert((a, b));
            }
        }
        Ok(pairs)
    }

    // ========================================================================
    // Group priorities
    // ========================================================================

    pub fn priorities(&self, event_id: &str) -> StorageResult<HashMap<String, u32>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PRIORITIES_TABLE)?;
        let mut priorities = HashMap::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let (e, group) = key.value();
            if e == event_id {
                priorities.insert(group.to_string(), value.value());
            }
        }
        Ok(priorities)
    }

    /// Assign a priority; a nonzero priority may have at most one holder,
    /// so the previous holder is demoted (row removed) in the same
    /// transaction before the new assignment.
    pub fn set_priority(&self, event_id: &str, group_key: &str, priority: u32) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRIORITIES_TABLE)?;
            if priority == 0 {
                table.remove((event_id, group_key))?;
            } else {
                let mut holder: Option<String> = None;
                for entry in table.iter()? {
                    let (key, value) = entry?;
                    let (e, group) = key.value();
                    if e == event_id && value.value() == priority && group != group_key {
                        holder = Some(group.to_string());
                        break;
                    }
                }
                if let Some(previous) = holder {
                    table.remove((event_id, previous.as_str()))?;
                }
                table.insert((event_id, group_key), priority)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    // ========================================================================
    // Group conflicts
    // ========================================================================

    pub fn add_conflict(&self, event_id: &str, a: &str, b: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CONFLICTS_TABLE)?;
            table.insert((event_id, a, b), ())?;
            table.insert((event_id, b, a), ())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn remove_conflict(&self, event_id: &str, a: &str, b: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed;
        {
            let mut table = txn.open_table(CONFLICTS_TABLE)?;
            let first = table.remove((event_id, a, b))?.is_some();
            let second = table.remove((event_id, b, a))?.is_some();
            existed = first || second;
        }
        txn.commit()?;
        Ok(existed)
    }

    pub fn conflicts(&self, event_id: &str) -> StorageResult<Vec<GroupConflict>> {
        let pairs = self.conflict_pairs(event_id)?;
        let mut conflicts: Vec<GroupConflict> = pairs
            .into_iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| GroupConflict {
                event_id: event_id.to_string(),
                group_a: a,
                group_b: b,
            })
            .collect();
        conflicts.sort_by(|x, y| (&x.group_a, &x.group_b).cmp(&(&y.group_a, &y.group_b)));
        Ok(conflicts)
    }

    pub fn conflict_pairs(&self, event_id: &str) -> StorageResult<HashSet<(String, String)>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(CONFLICTS_TABLE)?;
        let mut pairs = HashSet::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let (e, a, b) = key.value();
            if e == event_id {
                pairs.insert((a.to_string(), b.to_string()));
            }
        }
        Ok(pairs)
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn settings(&self, event_id: &str) -> StorageResult<Option<SeatingSettings>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS_TABLE)?;
        match table.get(event_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_settings(&self, settings: &SeatingSettings) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS_TABLE)?;
            let bytes = serde_json::to_vec(settings)?;
            table.insert(settings.event_id.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========================================================================
    // Seat ledger
    // ========================================================================

    pub fn ledger(
        &self,
        event_id: &str,
        track: AssignmentTrack,
    ) -> StorageResult<Vec<SeatAssignment>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(LEDGER_TABLE)?;
        let mut rows = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let (e, t, _g) = key.value();
            if e == event_id && t == track.as_str() {
                rows.push(serde_json::from_slice(value.value())?);
            }
        }
        rows.sort_by(|a: &SeatAssignment, b: &SeatAssignment| {
            (a.table_number, &a.guest_id).cmp(&(b.table_number, &b.guest_id))
        });
        Ok(rows)
    }

    /// Does any record exist for this event?
    pub fn event_exists(&self, event_id: &str) -> StorageResult<bool> {
        Ok(!self.guests(event_id)?.is_empty()
            || !self.tables(event_id)?.is_empty()
            || self.settings(event_id)?.is_some())
    }

    // ========================================================================
    // Engine write paths
    // ========================================================================

    /// Replace one track's ledger with the plan, atomically
    ///
    /// Creates the plan's auto tables, rewrites the track's rows, drops
    /// auto tables no track references anymore, and — for the real track —
    /// rebuilds occupant caches and the guests' denormalized table number.
    /// The simulation track never touches real rows or caches.
    pub fn apply_plan(
        &self,
        event_id: &str,
        track: AssignmentTrack,
        plan: &PlacementPlan,
    ) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut tables = txn.open_table(TABLES_TABLE)?;
            for planned in &plan.new_tables {
                let row = SeatingTable {
                    event_id: event_id.to_string(),
                    number: planned.number,
                    capacity: planned.capacity,
                    table_type: planned.table_type,
                    origin: TableOrigin::Auto,
                    locked: false,
                    occupants: Vec::new(),
                };
                let bytes = serde_json::to_vec(&row)?;
                tables.insert((event_id, planned.number), bytes.as_slice())?;
            }

            let mut ledger = txn.open_table(LEDGER_TABLE)?;
            let mut stale: Vec<String> = Vec::new();
            for entry in ledger.iter()? {
                let (key, _) = entry?;
                let (e, t, guest) = key.value();
                if e == event_id && t == track.as_str() {
                    stale.push(guest.to_string());
                }
            }
            for guest in &stale {
                ledger.remove((event_id, track.as_str(), guest.as_str()))?;
            }
            for placement in &plan.placements {
                for member in &placement.members {
                    let row = SeatAssignment {
                        event_id: event_id.to_string(),
                        table_number: placement.table_number,
                        guest_id: member.guest_id.clone(),
                        track,
                        seats: member.seats,
                    };
                    let bytes = serde_json::to_vec(&row)?;
                    ledger.insert(
                        (event_id, track.as_str(), member.guest_id.as_str()),
                        bytes.as_slice(),
                    )?;
                }
            }

            // Auto tables empty on both tracks are engine-owned garbage
            let mut referenced: HashSet<u32> = HashSet::new();
            for entry in ledger.iter()? {
                let (key, value) = entry?;
                let (e, _t, _g) = key.value();
                if e == event_id {
                    let row: SeatAssignment = serde_json::from_slice(value.value())?;
                    referenced.insert(row.table_number);
                }
            }
            let mut existing: Vec<SeatingTable> = Vec::new();
            for entry in tables.iter()? {
                let (key, value) = entry?;
                let (e, _n) = key.value();
                if e == event_id {
                    existing.push(serde_json::from_slice(value.value())?);
                }
            }
            for t in &existing {
                if t.origin == TableOrigin::Auto && !t.locked && !referenced.contains(&t.number) {
                    tables.remove((event_id, t.number))?;
                }
            }
        }
        if track == AssignmentTrack::Real {
            rebuild_real_caches(&txn, event_id)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Copy every simulation row to the real track
    ///
    /// Existing real rows are deleted first, in the same transaction.
    /// Returns the number of rows moved; 0 means there was nothing to
    /// promote and nothing was changed.
    pub fn promote(&self, event_id: &str) -> StorageResult<usize> {
        let txn = self.db.begin_write()?;
        let moved;
        {
            let mut ledger = txn.open_table(LEDGER_TABLE)?;
            let mut sim_rows: Vec<SeatAssignment> = Vec::new();
            let mut real_guests: Vec<String> = Vec::new();
            for entry in ledger.iter()? {
                let (key, value) = entry?;
                let (e, t, guest) = key.value();
                if e != event_id {
                    continue;
                }
                if t == AssignmentTrack::Simulation.as_str() {
                    sim_rows.push(serde_json::from_slice(value.value())?);
                } else {
                    real_guests.push(guest.to_string());
                }
            }
            if sim_rows.is_empty() {
                // Transaction dropped without commit; nothing changed
                return Ok(0);
            }
            for guest in &real_guests {
                ledger.remove((event_id, AssignmentTrack::Real.as_str(), guest.as_str()))?;
            }
            moved = sim_rows.len();
            for row in sim_rows {
                let real_row = SeatAssignment {
                    track: AssignmentTrack::Real,
                    ..row
                };
                let bytes = serde_json::to_vec(&real_row)?;
                ledger.insert(
                    (
                        event_id,
                        AssignmentTrack::Real.as_str(),
                        real_row.guest_id.as_str(),
                    ),
                    bytes.as_slice(),
                )?;
            }
        }
        rebuild_real_caches(&txn, event_id)?;
        txn.commit()?;
        Ok(moved)
    }

    /// The destructive auto→manual transition
    ///
    /// Deletes every ledger row on both tracks, deletes auto-origin
    /// tables, clears every surviving table's occupant cache, and clears
    /// the guests' denormalized table numbers. Manual tables survive.
    pub fn purge_to_manual(&self, event_id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut ledger = txn.open_table(LEDGER_TABLE)?;
            let mut stale: Vec<(String, String)> = Vec::new();
            for entry in ledger.iter()? {
                let (key, _) = entry?;
                let (e, t, g) = key.value();
                if e == event_id {
                    stale.push((t.to_string(), g.to_string()));
                }
            }
            for (t, g) in &stale {
                ledger.remove((event_id, t.as_str(), g.as_str()))?;
            }

            let mut tables = txn.open_table(TABLES_TABLE)?;
            let mut existing: Vec<SeatingTable> = Vec::new();
            for entry in tables.iter()? {
                let (key, value) = entry?;
                let (e, _n) = key.value();
                if e == event_id {
                    existing.push(serde_json::from_slice(value.value())?);
                }
            }
            for mut t in existing {
                if t.origin == TableOrigin::Auto {
                    tables.remove((event_id, t.number))?;
                } else {
                    t.occupants.clear();
                    let bytes = serde_json::to_vec(&t)?;
                    tables.insert((event_id, t.number), bytes.as_slice())?;
                }
            }

            let mut guests = txn.open_table(GUESTS_TABLE)?;
            let mut rows: Vec<Guest> = Vec::new();
            for entry in guests.iter()? {
                let (key, value) = entry?;
                let (e, _id) = key.value();
                if e == event_id {
                    rows.push(serde_json::from_slice(value.value())?);
                }
            }
            for mut g in rows {
                if g.table_number.is_some() {
                    g.table_number = None;
                    let bytes = serde_json::to_vec(&g)?;
                    guests.insert((event_id, g.id.as_str()), bytes.as_slice())?;
                }
            }
        }
        txn.commit()?;
        Ok(())
    }

    // ========================================================================
    // Read projection
    // ========================================================================

    /// Per-table occupants with seat counts for one track
    ///
    /// Real reads start from the occupant cache (plus any ledger rows the
    /// cache missed); simulation reads come straight from the ledger. A
    /// guest without a ledger row falls back to their confirmed attendance
    /// (real), or one provisional seat when not yet confirmed (simulation).
    pub fn assignments(
        &self,
        event_id: &str,
        track: AssignmentTrack,
    ) -> StorageResult<Vec<TableWithOccupants>> {
        let guests: HashMap<String, Guest> = self
            .guests(event_id)?
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect();
        let tables = self.tables(event_id)?;
        let mut rows_by_table: BTreeMap<u32, Vec<SeatAssignment>> = BTreeMap::new();
        for row in self.ledger(event_id, track)? {
            rows_by_table.entry(row.table_number).or_default().push(row);
        }

        let mut out = Vec::with_capacity(tables.len());
        for table in tables {
            let ledger_rows = rows_by_table.remove(&table.number).unwrap_or_default();
            let mut ids: Vec<String> = match track {
                AssignmentTrack::Real => table.occupants_deduped(),
                AssignmentTrack::Simulation => Vec::new(),
            };
            for row in &ledger_rows {
                if !ids.contains(&row.guest_id) {
                    ids.push(row.guest_id.clone());
                }
            }

            let mut occupants = Vec::with_capacity(ids.len());
            for id in ids {
                let Some(guest) = guests.get(&id) else {
                    continue;
                };
                let seats = ledger_rows
                    .iter()
                    .find(|r| r.guest_id == id)
                    .map(|r| r.seats)
                    .unwrap_or_else(|| fallback_seats(guest, track));
                occupants.push(OccupantSeats {
                    guest_id: id,
                    name: guest.name.clone(),
                    seats,
                });
            }
            let seats_total = occupants.iter().map(|o| o.seats).sum();
            out.push(TableWithOccupants {
                number: table.number,
                capacity: table.capacity,
                table_type: table.table_type,
                origin: table.origin,
                locked: table.locked,
                occupants,
                seats_total,
            });
        }
        Ok(out)
    }
}

/// Seat count when no ledger row exists for a (table, guest, track)
fn fallback_seats(guest: &Guest, track: AssignmentTrack) -> u32 {
    match track {
        AssignmentTrack::Real => guest.attendance(),
        AssignmentTrack::Simulation => {
            if guest.rsvp == RsvpStatus::Confirmed {
                guest.attendance()
            } else {
                1
            }
        }
    }
}

/// Rebuild the real-track derived state inside an open transaction:
/// table occupant caches and guests' denormalized table numbers.
fn rebuild_real_caches(txn: &WriteTransaction, event_id: &str) -> StorageResult<()> {
    let mut by_table: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    let mut guest_table: HashMap<String, u32> = HashMap::new();
    {
        let ledger = txn.open_table(LEDGER_TABLE)?;
        for entry in ledger.iter()? {
            let (key, value) = entry?;
            let (e, t, _g) = key.value();
            if e == event_id && t == AssignmentTrack::Real.as_str() {
                let row: SeatAssignment = serde_json::from_slice(value.value())?;
                by_table
                    .entry(row.table_number)
                    .or_default()
                    .push(row.guest_id.clone());
                guest_table.insert(row.guest_id, row.table_number);
            }
        }
    }
    for ids in by_table.values_mut() {
        ids.sort();
    }

    {
        let mut tables = txn.open_table(TABLES_TABLE)?;
        let mut rows: Vec<SeatingTable> = Vec::new();
        for entry in tables.iter()? {
            let (key, value) = entry?;
            let (e, _n) = key.value();
            if e == event_id {
                rows.push(serde_json::from_slice(value.value())?);
            }
        }
        for mut t in rows {
            t.occupants = by_table.remove(&t.number).unwrap_or_default();
            let bytes = serde_json::to_vec(&t)?;
            tables.insert((event_id, t.number), bytes.as_slice())?;
        }
    }

    {
        let mut guests = txn.open_table(GUESTS_TABLE)?;
        let mut rows: Vec<Guest> = Vec::new();
        for entry in guests.iter()? {
            let (key, value) = entry?;
            let (e, _id) = key.value();
            if e == event_id {
                rows.push(serde_json::from_slice(value.value())?);
            }
        }
        for mut g in rows {
            let number = guest_table.get(&g.id).copied();
            if g.table_number != number {
                g.table_number = number;
                let bytes = serde_json::to_vec(&g)?;
                guests.insert((event_id, g.id.as_str()), bytes.as_slice())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(event: &str, id: &str, adults: u32) -> Guest {
        Guest {
            id: id.to_string(),
            event_id: event.to_string(),
            name: format!("Guest {id}"),
            family_group: None,
            adults,
            children: 0,
            age: None,
            rsvp: RsvpStatus::Confirmed,
            locked_seat: false,
            locked_table: None,
            table_number: None,
        }
    }

    #[test]
    fn guest_round_trip() {
        let storage = SeatingStorage::open_in_memory().unwrap();
        storage.put_guest(&guest("evt", "g1", 2)).unwrap();

        let found = storage.get_guest("evt", "g1").unwrap().unwrap();
        assert_eq!(found.attendance(), 2);
        assert!(storage.get_guest("evt", "g2").unwrap().is_none());
        assert!(storage.get_guest("other", "g1").unwrap().is_none());
    }

    #[test]
    fn adjacency_is_stored_both_ways() {
        let storage = SeatingStorage::open_in_memory().unwrap();
        storage.add_adjacency("evt", 1, 2).unwrap();

        let pairs = storage.adjacency_pairs("evt").unwrap();
        assert!(pairs.contains(&(1, 2)));
        assert!(pairs.contains(&(2, 1)));
        assert_eq!(storage.adjacencies("evt").unwrap().len(), 1);

        assert!(storage.remove_adjacency("evt", 2, 1).unwrap());
        assert!(storage.adjacency_pairs("evt").unwrap().is_empty());
    }

    #[test]
    fn duplicate_priority_demotes_previous_holder() {
        let storage = SeatingStorage::open_in_memory().unwrap();
        storage.set_priority("evt", "smith", 1).unwrap();
        storage.set_priority("evt", "jones", 1).unwrap();

        let priorities = storage.priorities("evt").unwrap();
        assert_eq!(priorities.get("jones"), Some(&1));
        assert!(!priorities.contains_key("smith"));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seating.redb");
        {
            let storage = SeatingStorage::open(&path).unwrap();
            storage.put_guest(&guest("evt", "g1", 2)).unwrap();
            storage.set_priority("evt", "smith", 1).unwrap();
        }

        let storage = SeatingStorage::open(&path).unwrap();
        assert!(storage.get_guest("evt", "g1").unwrap().is_some());
        assert_eq!(storage.priorities("evt").unwrap().get("smith"), Some(&1));
    }

    #[test]
    fn promote_with_no_simulation_rows_changes_nothing() {
        let storage = SeatingStorage::open_in_memory().unwrap();
        storage.put_guest(&guest("evt", "g1", 1)).unwrap();

        assert_eq!(storage.promote("evt").unwrap(), 0);
        assert!(storage.ledger("evt", AssignmentTrack::Real).unwrap().is_empty());
    }
}
