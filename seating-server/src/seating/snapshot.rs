//! Constraint model
//!
//! Assembles, for one event and one track, the complete read-only snapshot
//! the packing algorithm consumes: eligible guest groups with per-track
//! weights, tables, the adjacency set, conflicts, priorities, and settings.

use crate::seating::storage::SeatingStorage;
use crate::seating::{SeatingError, SeatingResult};
use shared::models::{AssignmentTrack, Guest, RsvpStatus, SeatAssignment, SeatingSettings, SeatingTable};
use std::collections::{BTreeMap, HashMap, HashSet};

/// One guest's contribution to a group, with the track-dependent weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub guest_id: String,
    pub seats: u32,
    pub is_kid: bool,
}

/// A family/party unit sharing one seating decision
#[derive(Debug, Clone)]
pub struct GuestGroup {
    pub key: String,
    /// Ordered by guest id
    pub members: Vec<GroupMember>,
    /// 0 = unranked
    pub priority: u32,
    /// Hard lock: the group must sit at exactly this table
    pub locked_table: Option<u32>,
    /// Soft pin used by group-scoped repacks; overflow warns, never fails
    pub pinned_table: Option<u32>,
}

impl GuestGroup {
    pub fn weight(&self) -> u32 {
        self.members.iter().map(|m| m.seats).sum()
    }

    pub fn kids_only(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|m| m.is_kid)
    }
}

/// Complete input snapshot for one (event, track) pack
#[derive(Debug, Clone)]
pub struct ConstraintSnapshot {
    pub event_id: String,
    pub track: AssignmentTrack,
    pub groups: Vec<GuestGroup>,
    pub tables: Vec<SeatingTable>,
    /// Adjacent table pairs, both directions
    pub adjacency: HashSet<(u32, u32)>,
    /// Keep-apart group pairs, both directions
    pub conflicts: HashSet<(String, String)>,
    pub settings: SeatingSettings,
    /// Current ledger rows for this track, keyed by guest id
    pub current: HashMap<String, SeatAssignment>,
}

impl ConstraintSnapshot {
    /// Load the snapshot; fails only when the event is entirely unknown
    pub fn load(
        storage: &SeatingStorage,
        event_id: &str,
        track: AssignmentTrack,
    ) -> SeatingResult<Self> {
        let mut guests = storage.guests(event_id)?;
        let mut tables = storage.tables(event_id)?;
        let settings = storage.settings(event_id)?;

        if guests.is_empty() && tables.is_empty() && settings.is_none() {
            return Err(SeatingError::NotFound(format!("Event {event_id} not found")));
        }
        let settings = settings.unwrap_or_else(|| SeatingSettings::defaults_for(event_id));

        guests.sort_by(|a, b| a.id.cmp(&b.id));
        tables.sort_by_key(|t| t.number);
        let table_numbers: HashSet<u32> = tables.iter().map(|t| t.number).collect();

        let priorities = storage.priorities(event_id)?;
        let current: HashMap<String, SeatAssignment> = storage
            .ledger(event_id, track)?
            .into_iter()
            .map(|row| (row.guest_id.clone(), row))
            .collect();

        let mut grouped: BTreeMap<String, Vec<&Guest>> = BTreeMap::new();
        for guest in guests.iter().filter(|g| g.rsvp != RsvpStatus::Declined) {
            grouped.entry(guest.group_key().to_string()).or_default().push(guest);
        }

        let mut groups = Vec::with_capacity(grouped.len());
        for (key, members) in grouped {
            let mut locked_table = None;
            for guest in &members {
                if guest.locked_seat
                    && let Some(number) = guest.locked_table
                {
                    if table_numbers.contains(&number) {
                        locked_table = Some(number);
                    } else {
                        tracing::warn!(
                            event_id,
                            guest_id = %guest.id,
                            table = number,
                            "locked table does not exist, treating group as unlocked"
                        );
                    }
                    break;
                }
            }

            let members: Vec<GroupMember> = members
                .iter()
                .copied()
                .map(|g| GroupMember {
                    guest_id: g.id.clone(),
                    seats: member_seats(g, track),
                    is_kid: g.adults == 0
                        && g.age.map(|a| a < settings.kids_table_min_age).unwrap_or(false),
                })
                .collect();

            groups.push(GuestGroup {
                priority: priorities.get(&key).copied().unwrap_or(0),
                key,
                members,
                locked_table,
                pinned_table: None,
            });
        }

        Ok(Self {
            event_id: event_id.to_string(),
            track,
            groups,
            tables,
            adjacency: storage.adjacency_pairs(event_id)?,
            conflicts: storage.conflict_pairs(event_id)?,
            settings,
            current,
        })
    }

    /// Narrow the snapshot to a single-group run
    ///
    /// Every other group is pinned to the table its members currently
    /// occupy; groups holding no seat on this track are dropped so a
    /// targeted run cannot pull them in as a side effect.
    pub fn pin_all_except(&mut self, target: &str) {
        let current = &self.current;
        self.groups.retain(|g| {
            g.key == target || g.members.iter().any(|m| current.contains_key(&m.guest_id))
        });
        for group in &mut self.groups {
            if group.key == target {
                continue;
            }
            group.pinned_table = group
                .members
                .iter()
                .find_map(|m| current.get(&m.guest_id).map(|row| row.table_number));
        }
    }
}

/// Per-track attendance weight
///
/// Real: confirmed totals apply to everyone not declined. Simulation:
/// confirmed guests keep their totals, pending guests hold one
/// provisional seat.
fn member_seats(guest: &Guest, track: AssignmentTrack) -> u32 {
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
