//! Seating Settings Model

use serde::{Deserialize, Serialize};

/// Seating mode enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatingMode {
    Manual,
    Auto,
}

/// Automatic recalculation policy enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoRecalcPolicy {
    /// An RSVP change re-packs only the changed guest's group
    OnRsvpChangeGroupOnly,
    /// An RSVP change triggers a full repack
    OnRsvpChangeAll,
    /// Recalculation only on explicit request
    ManualOnly,
}

/// Adjacency policy enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjacencyPolicy {
    /// Conflicting groups may not share a table
    ForbidSameTableOnly,
    /// Conflicting groups may not share a table nor sit at adjacent tables
    ForbidSameAndAdjacent,
}

/// Per-event seating settings (singleton)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatingSettings {
    pub event_id: String,
    pub mode: SeatingMode,
    /// Capacity of engine-created tables (1–20)
    pub seats_per_table: u32,
    pub auto_recalc_policy: AutoRecalcPolicy,
    pub adjacency_policy: AdjacencyPolicy,
    pub enable_kids_table: bool,
    pub kids_table_min_age: u32,
    /// Combined kids weight required before a kids table is carved out
    pub kids_table_min_count: u32,
    pub avoid_singles_alone: bool,
    pub enable_zone_placement: bool,
}

impl SeatingSettings {
    pub fn defaults_for(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            mode: SeatingMode::Auto,
            seats_per_table: 10,
            auto_recalc_policy: AutoRecalcPolicy::OnRsvpChangeGroupOnly,
            adjacency_policy: AdjacencyPolicy::ForbidSameTableOnly,
            enable_kids_table: false,
            kids_table_min_age: 12,
            kids_table_min_count: 4,
            avoid_singles_alone: true,
            enable_zone_placement: false,
        }
    }

    /// Merge a partial update; absent fields keep their current value
    pub fn apply(&mut self, patch: SeatingSettingsUpdate) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(seats) = patch.seats_per_table {
            self.seats_per_table = seats;
        }
        if let Some(policy) = patch.auto_recalc_policy {
            self.auto_recalc_policy = policy;
        }
        if let Some(policy) = patch.adjacency_policy {
            self.adjacency_policy = policy;
        }
        if let Some(enabled) = patch.enable_kids_table {
            self.enable_kids_table = enabled;
        }
        if let Some(age) = patch.kids_table_min_age {
            self.kids_table_min_age = age;
        }
        if let Some(count) = patch.kids_table_min_count {
            self.kids_table_min_count = count;
        }
        if let Some(avoid) = patch.avoid_singles_alone {
            self.avoid_singles_alone = avoid;
        }
        if let Some(zones) = patch.enable_zone_placement {
            self.enable_zone_placement = zones;
        }
    }
}

/// Update settings payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatingSettingsUpdate {
    pub mode: Option<SeatingMode>,
    pub seats_per_table: Option<u32>,
    pub auto_recalc_policy: Option<AutoRecalcPolicy>,
    pub adjacency_policy: Option<AdjacencyPolicy>,
    pub enable_kids_table: Option<bool>,
    pub kids_table_min_age: Option<u32>,
    pub kids_table_min_count: Option<u32>,
    pub avoid_singles_alone: Option<bool>,
    pub enable_zone_placement: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let settings = SeatingSettings::defaults_for("evt-1");
        let json = serde_json::to_string(&settings).unwrap();
        let back: SeatingSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seats_per_table, 10);
        assert_eq!(back.mode, SeatingMode::Auto);
        assert_eq!(back.auto_recalc_policy, AutoRecalcPolicy::OnRsvpChangeGroupOnly);
    }

    #[test]
    fn policy_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&AdjacencyPolicy::ForbidSameAndAdjacent).unwrap();
        assert_eq!(json, "\"FORBID_SAME_AND_ADJACENT\"");
    }
}
