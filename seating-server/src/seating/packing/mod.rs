//! Packing algorithm
//!
//! Deterministic function from (groups, tables, settings, adjacency) to a
//! [`PlacementPlan`]. Pure: no storage access, no clock, no randomness.
//!
//! Passes run in strict priority order:
//!
//! 1. Locked tables keep their exact current occupants; locked groups go
//!    to their locked table (infeasibility here is a hard error).
//! 2. Pinned groups stay where they are (soft; overflow only warns).
//! 3. Priority groups seed into the lowest-numbered fitting table.
//! 4. Kids-table carve-out, when enabled and the kids weight threshold is
//!    met.
//! 5. Best-fit-decreasing bulk packing of the unranked remainder.
//! 6. Singles-avoidance merge of weight-1 tables.
//!
//! Ties always break on lower table number, then lexicographically smaller
//! group key, so identical input yields an identical plan.

pub mod plan;

pub use plan::{
    GroupPlacement, MemberSeat, PackingError, PackingWarning, PlacementPlan, PlannedTable,
};

use crate::seating::separation::SeparationPolicy;
use crate::seating::snapshot::{GroupMember, GuestGroup};
use shared::models::{
    AdjacencyPolicy, SeatAssignment, SeatingSettings, SeatingTable, TableType,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Everything the algorithm needs, borrowed from the constraint snapshot
pub struct PackingInput<'a> {
    pub groups: &'a [GuestGroup],
    pub tables: &'a [SeatingTable],
    pub settings: &'a SeatingSettings,
    /// Adjacent table pairs, both directions present
    pub adjacency: &'a HashSet<(u32, u32)>,
    /// Current ledger rows for the track being packed, keyed by guest id
    pub current: &'a HashMap<String, SeatAssignment>,
    pub separation: &'a dyn SeparationPolicy,
}

/// Compute a placement plan for the given input
pub fn pack(input: &PackingInput<'_>) -> Result<PlacementPlan, PackingError> {
    let mut packer = Packer::new(input);
    packer.seed_locked_tables()?;
    packer.place_locked_groups()?;
    packer.place_pinned_groups();
    packer.seed_priority_groups();
    packer.carve_out_kids();
    packer.bulk_pack();
    packer.merge_singles();
    Ok(packer.finish())
}

/// Mutable packing state for one table
struct Slot {
    number: u32,
    capacity: u32,
    used: u32,
    table_type: TableType,
    locked: bool,
    is_new: bool,
    /// Group keys already seated here
    groups: Vec<String>,
}

impl Slot {
    fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }
}

/// Working copy of a group; members shrink as locked tables fix guests
struct WorkGroup {
    key: String,
    members: Vec<GroupMember>,
    priority: u32,
    locked_table: Option<u32>,
    pinned_table: Option<u32>,
    kids_only: bool,
    placed: bool,
}

impl WorkGroup {
    fn weight(&self) -> u32 {
        self.members.iter().map(|m| m.seats).sum()
    }
}

struct Packer<'a> {
    input: &'a PackingInput<'a>,
    slots: Vec<Slot>,
    groups: Vec<WorkGroup>,
    placements: Vec<GroupPlacement>,
    warnings: Vec<PackingWarning>,
    next_number: u32,
}

impl<'a> Packer<'a> {
    fn new(input: &'a PackingInput<'a>) -> Self {
        let mut slots: Vec<Slot> = input
            .tables
            .iter()
            .map(|t| Slot {
                number: t.number,
                capacity: t.capacity,
                used: 0,
                table_type: t.table_type,
                locked: t.locked,
                is_new: false,
                groups: Vec::new(),
            })
            .collect();
        slots.sort_by_key(|s| s.number);
        let next_number = slots.last().map(|s| s.number + 1).unwrap_or(1);

        let mut groups: Vec<WorkGroup> = input
            .groups
            .iter()
            .map(|g| WorkGroup {
                key: g.key.clone(),
                members: g.members.clone(),
                priority: g.priority,
                locked_table: g.locked_table,
                pinned_table: g.pinned_table,
                kids_only: g.kids_only(),
                placed: false,
            })
            .collect();
        groups.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            input,
            slots,
            groups,
            placements: Vec::new(),
            warnings: Vec::new(),
            next_number,
        }
    }

    fn slot_index(&self, number: u32) -> Option<usize> {
        self.slots.iter().position(|s| s.number == number)
    }

    fn new_slot(&mut self, table_type: TableType) -> usize {
        let number = self.next_number;
        self.next_number += 1;
        self.slots.push(Slot {
            number,
            capacity: self.input.settings.seats_per_table,
            used: 0,
            table_type,
            locked: false,
            is_new: true,
            groups: Vec::new(),
        });
        self.slots.len() - 1
    }

    /// Group key for a guest not covered by any eligible group (e.g. a
    /// declined guest still seated at a locked table)
    fn group_key_of(&self, guest_id: &str) -> String {
        for g in self.input.groups {
            if g.members.iter().any(|m| m.guest_id == guest_id) {
                return g.key.clone();
            }
        }
        guest_id.to_string()
    }

    /// Pass 1a: locked tables keep their exact current occupants
    fn seed_locked_tables(&mut self) -> Result<(), PackingError> {
        let locked_numbers: Vec<u32> = self
            .slots
            .iter()
            .filter(|s| s.locked)
            .map(|s| s.number)
            .collect();

        for number in locked_numbers {
            let mut rows: Vec<&SeatAssignment> = self
                .input
                .current
                .values()
                .filter(|r| r.table_number == number)
                .collect();
            rows.sort_by(|a, b| a.guest_id.cmp(&b.guest_id));
            if rows.is_empty() {
                continue;
            }

            let total: u32 = rows.iter().map(|r| r.seats).sum();
            let idx = self.slot_index(number).expect("locked slot exists");
            if total > self.slots[idx].capacity {
                return Err(PackingError::OverCapacity {
                    table: number,
                    required: total,
                    available: self.slots[idx].capacity,
                });
            }

            let mut by_group: BTreeMap<String, Vec<MemberSeat>> = BTreeMap::new();
            for row in &rows {
                by_group
                    .entry(self.group_key_of(&row.guest_id))
                    .or_default()
                    .push(MemberSeat {
                        guest_id: row.guest_id.clone(),
                        seats: row.seats,
                    });
            }

            let fixed_ids: HashSet<&str> = rows.iter().map(|r| r.guest_id.as_str()).collect();
            for (key, members) in by_group {
                self.slots[idx].groups.push(key.clone());
                self.placements.push(GroupPlacement {
                    group_key: key,
                    table_number: number,
                    members,
                });
            }
            self.slots[idx].used = total;

            // Fixed guests leave the free pool; their group may continue
            // as a residual fragment.
            for g in &mut self.groups {
                g.members.retain(|m| !fixed_ids.contains(m.guest_id.as_str()));
                if g.members.is_empty() {
                    g.placed = true;
                }
            }
        }
        Ok(())
    }

    /// Pass 1b: locked groups go to their locked table, or the pack fails
    fn place_locked_groups(&mut self) -> Result<(), PackingError> {
        for gi in 0..self.groups.len() {
            if self.groups[gi].placed {
                continue;
            }
            let Some(number) = self.groups[gi].locked_table else {
                continue;
            };
            let Some(idx) = self.slot_index(number) else {
                // Dangling lock target; the snapshot normally clears these.
                continue;
            };
            let required = self.groups[gi].weight();
            let available = self.slots[idx].remaining();
            if required > available {
                return Err(PackingError::OverCapacity {
                    table: number,
                    required,
                    available,
                });
            }
            self.place(gi, idx);
        }
        Ok(())
    }

    /// Pass 2: pinned groups stay put; overflow only warns
    fn place_pinned_groups(&mut self) {
        for gi in 0..self.groups.len() {
            if self.groups[gi].placed {
                continue;
            }
            let Some(number) = self.groups[gi].pinned_table else {
                continue;
            };
            match self.slot_index(number) {
                Some(idx) => self.place(gi, idx),
                None => self.groups[gi].pinned_table = None,
            }
        }
    }

    /// Pass 3: priority groups seed into the lowest-numbered fitting table
    fn seed_priority_groups(&mut self) {
        let mut ranked: Vec<usize> = (0..self.groups.len())
            .filter(|&i| {
                let g = &self.groups[i];
                !g.placed && g.priority > 0 && !g.members.is_empty()
            })
            .collect();
        ranked.sort_by_key(|&i| self.groups[i].priority);

        for gi in ranked {
            let target = self
                .slots
                .iter()
                .enumerate()
                .find(|(idx, _)| self.fits(gi, *idx))
                .map(|(idx, _)| idx);
            let idx = target.unwrap_or_else(|| self.new_slot(TableType::Mixed));
            self.place(gi, idx);
        }
    }

    /// Pass 4: kids-table carve-out
    fn carve_out_kids(&mut self) {
        if !self.input.settings.enable_kids_table {
            return;
        }
        let mut kids: Vec<usize> = (0..self.groups.len())
            .filter(|&i| {
                let g = &self.groups[i];
                !g.placed && g.kids_only && !g.members.is_empty() && g.weight() > 0
            })
            .collect();
        let total: u32 = kids.iter().map(|&i| self.groups[i].weight()).sum();
        if total < self.input.settings.kids_table_min_count {
            return;
        }
        kids.sort_by(|&a, &b| {
            self.groups[b]
                .weight()
                .cmp(&self.groups[a].weight())
                .then_with(|| self.groups[a].key.cmp(&self.groups[b].key))
        });

        for gi in kids {
            let idx = match self.tightest_fit(gi, Some(TableType::Kids)) {
                Some(idx) => idx,
                None => self.new_slot(TableType::Kids),
            };
            self.place(gi, idx);
        }
    }

    /// Pass 5: best-fit-decreasing bulk packing
    fn bulk_pack(&mut self) {
        let mut remaining: Vec<usize> = (0..self.groups.len())
            .filter(|&i| {
                let g = &self.groups[i];
                !g.placed && !g.members.is_empty() && g.weight() > 0
            })
            .collect();
        remaining.sort_by(|&a, &b| {
            self.groups[b]
                .weight()
                .cmp(&self.groups[a].weight())
                .then_with(|| self.groups[a].key.cmp(&self.groups[b].key))
        });

        for gi in remaining {
            let idx = match self.tightest_fit(gi, None) {
                Some(idx) => idx,
                None => self.new_slot(TableType::Mixed),
            };
            self.place(gi, idx);
        }
    }

    /// Pass 6: merge lone weight-1 guests into occupied tables
    fn merge_singles(&mut self) {
        if !self.input.settings.avoid_singles_alone {
            return;
        }
        for src in 0..self.slots.len() {
            if self.slots[src].locked
                || self.slots[src].used != 1
                || self.slots[src].groups.len() != 1
            {
                continue;
            }
            let key = self.slots[src].groups[0].clone();
            let Some(gi) = self.groups.iter().position(|g| g.key == key) else {
                continue;
            };
            if self.groups[gi].locked_table.is_some()
                || self.groups[gi].pinned_table.is_some()
                || self.groups[gi].weight() != 1
            {
                continue;
            }

            let mut best: Option<usize> = None;
            for idx in 0..self.slots.len() {
                if idx == src
                    || self.slots[idx].locked
                    || self.slots[idx].used == 0
                    || self.slots[idx].remaining() < 1
                    || !self.type_ok(gi, idx)
                    || !self.separation_ok(gi, idx)
                {
                    continue;
                }
                match best {
                    None => best = Some(idx),
                    Some(b) if self.slots[idx].remaining() < self.slots[b].remaining() => {
                        best = Some(idx)
                    }
                    _ => {}
                }
            }

            if let Some(dest) = best {
                let src_number = self.slots[src].number;
                let dest_number = self.slots[dest].number;
                if let Some(p) = self
                    .placements
                    .iter_mut()
                    .find(|p| p.group_key == key && p.table_number == src_number)
                {
                    p.table_number = dest_number;
                }
                self.slots[src].used = 0;
                self.slots[src].groups.clear();
                self.slots[dest].used += 1;
                self.slots[dest].groups.push(key);
                self.record_adjacent_conflicts(gi, dest);
            }
        }
    }

    /// Place a group and account for soft violations
    fn place(&mut self, gi: usize, idx: usize) {
        let weight = self.groups[gi].weight();
        let number = self.slots[idx].number;
        self.placements.push(GroupPlacement {
            group_key: self.groups[gi].key.clone(),
            table_number: number,
            members: self.groups[gi]
                .members
                .iter()
                .map(|m| MemberSeat {
                    guest_id: m.guest_id.clone(),
                    seats: m.seats,
                })
                .collect(),
        });
        let key = self.groups[gi].key.clone();
        self.slots[idx].groups.push(key);
        self.slots[idx].used += weight;
        self.groups[gi].placed = true;

        if self.slots[idx].used > self.slots[idx].capacity {
            self.warnings.push(PackingWarning::OverCapacity {
                table: number,
                capacity: self.slots[idx].capacity,
                seated: self.slots[idx].used,
            });
        }
        self.record_adjacent_conflicts(gi, idx);
    }

    /// Can this group go to this slot under every hard rule?
    fn fits(&self, gi: usize, idx: usize) -> bool {
        let slot = &self.slots[idx];
        !slot.locked
            && slot.remaining() >= self.groups[gi].weight()
            && self.type_ok(gi, idx)
            && self.separation_ok(gi, idx)
    }

    /// Fitting slot with the least remaining capacity; ties on lower number
    fn tightest_fit(&self, gi: usize, restrict: Option<TableType>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for idx in 0..self.slots.len() {
            if let Some(t) = restrict
                && self.slots[idx].table_type != t
            {
                continue;
            }
            if !self.fits(gi, idx) {
                continue;
            }
            match best {
                None => best = Some(idx),
                Some(b) if self.slots[idx].remaining() < self.slots[b].remaining() => {
                    best = Some(idx)
                }
                _ => {}
            }
        }
        best
    }

    fn type_ok(&self, gi: usize, idx: usize) -> bool {
        match self.slots[idx].table_type {
            TableType::Kids => self.groups[gi].kids_only,
            TableType::Adults => self.groups[gi].members.iter().all(|m| !m.is_kid),
            TableType::Mixed => true,
        }
    }

    /// Separation against already-placed groups; adjacency is hard only
    /// under `ForbidSameAndAdjacent`
    fn separation_ok(&self, gi: usize, idx: usize) -> bool {
        let key = &self.groups[gi].key;
        if self.conflicts_with_any(key, idx) {
            return false;
        }
        if self.input.settings.adjacency_policy == AdjacencyPolicy::ForbidSameAndAdjacent {
            let number = self.slots[idx].number;
            for other in 0..self.slots.len() {
                if self.is_adjacent(number, self.slots[other].number)
                    && self.conflicts_with_any(key, other)
                {
                    return false;
                }
            }
        }
        true
    }

    fn conflicts_with_any(&self, key: &str, idx: usize) -> bool {
        self.slots[idx]
            .groups
            .iter()
            .any(|other| other != key && self.input.separation.must_separate(key, other))
    }

    fn is_adjacent(&self, a: u32, b: u32) -> bool {
        self.input.adjacency.contains(&(a, b))
    }

    /// Under the relaxed policy, accepted adjacency conflicts still get
    /// reported in the summary
    fn record_adjacent_conflicts(&mut self, gi: usize, idx: usize) {
        if self.input.settings.adjacency_policy != AdjacencyPolicy::ForbidSameTableOnly {
            return;
        }
        let key = self.groups[gi].key.clone();
        let number = self.slots[idx].number;
        let mut found: Vec<PackingWarning> = Vec::new();
        for other in &self.slots {
            if !self.is_adjacent(number, other.number) {
                continue;
            }
            for other_key in &other.groups {
                if other_key != &key && self.input.separation.must_separate(&key, other_key) {
                    let (table_a, table_b) = if number < other.number {
                        (number, other.number)
                    } else {
                        (other.number, number)
                    };
                    let (group_a, group_b) = if key < *other_key {
                        (key.clone(), other_key.clone())
                    } else {
                        (other_key.clone(), key.clone())
                    };
                    found.push(PackingWarning::AdjacentConflict {
                        table_a,
                        table_b,
                        group_a,
                        group_b,
                    });
                }
            }
        }
        for w in found {
            if !self.warnings.contains(&w) {
                self.warnings.push(w);
            }
        }
    }

    fn finish(mut self) -> PlacementPlan {
        self.placements
            .sort_by(|a, b| (a.table_number, &a.group_key).cmp(&(b.table_number, &b.group_key)));
        let new_tables: Vec<PlannedTable> = self
            .slots
            .iter()
            .filter(|s| s.is_new && s.used > 0)
            .map(|s| PlannedTable {
                number: s.number,
                capacity: s.capacity,
                table_type: s.table_type,
            })
            .collect();
        PlacementPlan {
            placements: self.placements,
            new_tables,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seating::separation::ExplicitConflicts;
    use shared::models::{SeatingSettings, TableOrigin};

    fn group(key: &str, seats: u32) -> GuestGroup {
        GuestGroup {
            key: key.to_string(),
            members: vec![GroupMember {
                guest_id: format!("{key}-1"),
                seats,
                is_kid: false,
            }],
            priority: 0,
            locked_table: None,
            pinned_table: None,
        }
    }

    fn table(number: u32, capacity: u32, locked: bool) -> SeatingTable {
        SeatingTable {
            event_id: "evt".to_string(),
            number,
            capacity,
            table_type: TableType::Mixed,
            origin: TableOrigin::Manual,
            locked,
            occupants: Vec::new(),
        }
    }

    fn run(
        groups: &[GuestGroup],
        tables: &[SeatingTable],
        settings: &SeatingSettings,
        current: &HashMap<String, SeatAssignment>,
    ) -> Result<PlacementPlan, PackingError> {
        let adjacency = HashSet::new();
        let separation = ExplicitConflicts::default();
        pack(&PackingInput {
            groups,
            tables,
            settings,
            adjacency: &adjacency,
            current,
            separation: &separation,
        })
    }

    #[test]
    fn best_fit_decreasing_scenario() {
        let groups = [
            group("a", 10),
            group("b", 8),
            group("c", 4),
            group("d", 2),
            group("e", 1),
        ];
        let settings = SeatingSettings::defaults_for("evt");

        let plan = run(&groups, &[], &settings, &HashMap::new()).unwrap();

        // 10 | 8+2 | 4+1 across three fresh tables
        assert_eq!(plan.new_tables.len(), 3);
        assert_eq!(plan.seats_at(1), 10);
        assert_eq!(plan.seats_at(2), 10);
        assert_eq!(plan.seats_at(3), 5);
        assert_eq!(plan.table_of("b"), plan.table_of("d"));
        assert_eq!(plan.table_of("c"), plan.table_of("e"));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn identical_input_yields_identical_plan() {
        let groups = [group("a", 3), group("b", 3), group("c", 3), group("d", 6)];
        let tables = [table(1, 10, false), table(2, 10, false)];
        let settings = SeatingSettings::defaults_for("evt");

        let first = run(&groups, &tables, &settings, &HashMap::new()).unwrap();
        let second = run(&groups, &tables, &settings, &HashMap::new()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn locked_table_keeps_its_current_occupants() {
        let mut fam = group("fam", 0);
        fam.members = vec![
            GroupMember {
                guest_id: "g-1".to_string(),
                seats: 2,
                is_kid: false,
            },
            GroupMember {
                guest_id: "g-2".to_string(),
                seats: 2,
                is_kid: false,
            },
        ];
        let tables = [table(1, 10, true)];
        let mut current = HashMap::new();
        current.insert(
            "g-1".to_string(),
            SeatAssignment {
                event_id: "evt".to_string(),
                table_number: 1,
                guest_id: "g-1".to_string(),
                track: shared::models::AssignmentTrack::Real,
                seats: 2,
            },
        );
        let settings = SeatingSettings::defaults_for("evt");

        let plan = run(&[fam], &tables, &settings, &current).unwrap();

        // The fixed guest stays on the locked table; the rest of the
        // group continues as a fragment elsewhere
        assert_eq!(plan.seats_at(1), 2);
        assert_eq!(plan.seats_at(2), 2);
        let fragments: Vec<&GroupPlacement> = plan
            .placements
            .iter()
            .filter(|p| p.group_key == "fam")
            .collect();
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn infeasible_lock_is_a_hard_error() {
        let mut locked = group("fam", 6);
        locked.locked_table = Some(1);
        let tables = [table(1, 4, false)];
        let settings = SeatingSettings::defaults_for("evt");

        let err = run(&[locked], &tables, &settings, &HashMap::new()).unwrap_err();

        assert_eq!(
            err,
            PackingError::OverCapacity {
                table: 1,
                required: 6,
                available: 4,
            }
        );
    }

    #[test]
    fn oversized_group_is_placed_with_a_warning() {
        let groups = [group("clan", 12)];
        let settings = SeatingSettings::defaults_for("evt");

        let plan = run(&groups, &[], &settings, &HashMap::new()).unwrap();

        assert_eq!(plan.table_of("clan"), Some(1));
        assert_eq!(
            plan.warnings,
            vec![PackingWarning::OverCapacity {
                table: 1,
                capacity: 10,
                seated: 12,
            }]
        );
    }

    #[test]
    fn pinned_group_stays_put_even_when_tight() {
        let mut pinned = group("fam", 6);
        pinned.pinned_table = Some(1);
        let groups = [pinned, group("other", 8)];
        let tables = [table(1, 10, false), table(2, 10, false)];
        let settings = SeatingSettings::defaults_for("evt");

        let plan = run(&groups, &tables, &settings, &HashMap::new()).unwrap();

        assert_eq!(plan.table_of("fam"), Some(1));
        assert_eq!(plan.table_of("other"), Some(2));
    }
}
