//! Recalculation coordinator
//!
//! Serializes packing runs per event, decides which runs an RSVP change
//! triggers, and publishes change notifications over a broadcast channel.
//! Packing itself is pure; everything stateful funnels through here.

use crate::seating::packing::{self, PackingInput, PackingWarning};
use crate::seating::separation::ExplicitConflicts;
use crate::seating::snapshot::ConstraintSnapshot;
use crate::seating::storage::{SeatingStorage, TableWithOccupants};
use crate::seating::{SeatingError, SeatingResult};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use shared::models::{
    AssignmentTrack, SeatingMode, SeatingSettings, SeatingSettingsUpdate,
    AutoRecalcPolicy,
};
use shared::types::Timestamp;
use std::sync::Arc;
use tokio::sync::broadcast;

/// What a completed packing run did
#[derive(Debug, Clone, Serialize)]
pub struct PlacementSummary {
    pub event_id: String,
    pub track: AssignmentTrack,
    pub tables_touched: Vec<u32>,
    pub groups_placed: usize,
    pub groups_unplaced: Vec<String>,
    pub warnings: Vec<PackingWarning>,
}

/// Result of an RSVP-triggered recalculation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecalcOutcome {
    /// Policy or mode said not to run
    Skipped,
    /// Only the changed guest's group was re-packed
    Group(PlacementSummary),
    /// The whole event was re-packed
    Full(PlacementSummary),
}

/// Coordinator state for one event, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalcState {
    Manual,
    AutoIdle,
    AutoRecalculating,
}

/// Broadcast payload for seating changes
#[derive(Debug, Clone, Serialize)]
pub struct SeatingChange {
    pub event_id: String,
    pub at: Timestamp,
    #[serde(flatten)]
    pub kind: SeatingChangeKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SeatingChangeKind {
    PlanApplied {
        track: AssignmentTrack,
        groups_placed: usize,
        tables_touched: Vec<u32>,
    },
    SimulationPromoted {
        moved_count: usize,
    },
    SettingsUpdated,
}

/// Seating manager: one per process, shared behind `Arc`
pub struct SeatingManager {
    storage: SeatingStorage,
    /// Per-event run locks; repacks for the same event never interleave
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Events with a repack currently in flight
    recalculating: DashMap<String, ()>,
    event_tx: broadcast::Sender<SeatingChange>,
}

impl SeatingManager {
    pub fn new(storage: SeatingStorage) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            storage,
            locks: DashMap::new(),
            recalculating: DashMap::new(),
            event_tx,
        }
    }

    pub fn storage(&self) -> &SeatingStorage {
        &self.storage
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SeatingChange> {
        self.event_tx.subscribe()
    }

    fn event_lock(&self, event_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(event_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn broadcast(&self, event_id: &str, kind: SeatingChangeKind) {
        // Receiver count may be zero; that is not an error
        let _ = self.event_tx.send(SeatingChange {
            event_id: event_id.to_string(),
            at: chrono::Utc::now().timestamp_millis(),
            kind,
        });
    }

    /// Externally visible coordinator state for an event
    pub fn state(&self, event_id: &str) -> SeatingResult<RecalcState> {
        if self.recalculating.contains_key(event_id) {
            return Ok(RecalcState::AutoRecalculating);
        }
        // Same fallback as every other path: unstored settings mean defaults
        let mode = self.settings(event_id)?.mode;
        Ok(match mode {
            SeatingMode::Manual => RecalcState::Manual,
            SeatingMode::Auto => RecalcState::AutoIdle,
        })
    }

    // ========================================================================
    // Packing runs
    // ========================================================================

    /// Re-pack every unlocked group of the event on the given track
    pub fn run_full_repack(
        &self,
        event_id: &str,
        track: AssignmentTrack,
    ) -> SeatingResult<PlacementSummary> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock();

        self.ensure_auto_mode(event_id)?;
        self.recalculating.insert(event_id.to_string(), ());
        let result = self.repack_inner(event_id, track, None);
        self.recalculating.remove(event_id);

        let summary = result?;
        self.broadcast(
            event_id,
            SeatingChangeKind::PlanApplied {
                track,
                groups_placed: summary.groups_placed,
                tables_touched: summary.tables_touched.clone(),
            },
        );
        Ok(summary)
    }

    /// Re-pack a single group, pinning every other placed group in place
    pub fn run_group_repack(
        &self,
        event_id: &str,
        track: AssignmentTrack,
        group_key: &str,
    ) -> SeatingResult<PlacementSummary> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock();

        self.ensure_auto_mode(event_id)?;
        self.recalculating.insert(event_id.to_string(), ());
        let result = self.repack_inner(event_id, track, Some(group_key));
        self.recalculating.remove(event_id);

        let summary = result?;
        self.broadcast(
            event_id,
            SeatingChangeKind::PlanApplied {
                track,
                groups_placed: summary.groups_placed,
                tables_touched: summary.tables_touched.clone(),
            },
        );
        Ok(summary)
    }

    /// The run itself: snapshot, pack, persist
    ///
    /// With `only_group` set, every other group that currently holds a
    /// seat is pinned to its table so a targeted re-pack cannot shuffle
    /// bystanders; groups with no current seat are left out of the run
    /// entirely rather than pulled in as a side effect.
    fn repack_inner(
        &self,
        event_id: &str,
        track: AssignmentTrack,
        only_group: Option<&str>,
    ) -> SeatingResult<PlacementSummary> {
        let mut snapshot = ConstraintSnapshot::load(&self.storage, event_id, track)?;

        if let Some(target) = only_group {
            if !snapshot.groups.iter().any(|g| g.key == target) {
                // Every member may have declined; the group then has no
                // eligible seats but its stale ledger rows still must go.
                // Only a key no guest record ever carried is an error.
                let known = self
                    .storage
                    .guests(event_id)?
                    .iter()
                    .any(|g| g.group_key() == target);
                if !known {
                    return Err(SeatingError::NotFound(format!(
                        "Group not found: {target}"
                    )));
                }
            }
            snapshot.pin_all_except(target);
        }

        let conflicts = self.storage.conflict_pairs(event_id)?;
        let separation = ExplicitConflicts::new(conflicts);
        let input = PackingInput {
            groups: &snapshot.groups,
            tables: &snapshot.tables,
            settings: &snapshot.settings,
            adjacency: &snapshot.adjacency,
            current: &snapshot.current,
            separation: &separation,
        };
        let plan = packing::pack(&input)?;

        self.storage.apply_plan(event_id, track, &plan)?;

        let placed_keys: std::collections::BTreeSet<String> = plan
            .group_keys()
            .into_iter()
            .map(str::to_string)
            .collect();
        let tables_touched: Vec<u32> = plan.table_numbers().into_iter().collect();
        let groups_unplaced: Vec<String> = snapshot
            .groups
            .iter()
            .filter(|g| !placed_keys.contains(&g.key))
            .map(|g| g.key.clone())
            .collect();
        let summary = PlacementSummary {
            event_id: event_id.to_string(),
            track,
            tables_touched,
            groups_placed: placed_keys.len(),
            groups_unplaced,
            warnings: plan.warnings,
        };
        tracing::info!(
            event_id,
            track = track.as_str(),
            groups = summary.groups_placed,
            tables = summary.tables_touched.len(),
            warnings = summary.warnings.len(),
            "Placement plan applied"
        );
        Ok(summary)
    }

    fn ensure_auto_mode(&self, event_id: &str) -> SeatingResult<()> {
        let settings = self
            .storage
            .settings(event_id)?
            .unwrap_or_else(|| SeatingSettings::defaults_for(event_id));
        if settings.mode == SeatingMode::Manual {
            return Err(SeatingError::ManualMode);
        }
        Ok(())
    }

    // ========================================================================
    // RSVP hook
    // ========================================================================

    /// Called after a guest's RSVP is persisted; decides what to re-run
    pub fn rsvp_changed(&self, event_id: &str, guest_id: &str) -> SeatingResult<RecalcOutcome> {
        let settings = self
            .storage
            .settings(event_id)?
            .unwrap_or_else(|| SeatingSettings::defaults_for(event_id));
        if settings.mode == SeatingMode::Manual
            || settings.auto_recalc_policy == AutoRecalcPolicy::ManualOnly
        {
            return Ok(RecalcOutcome::Skipped);
        }

        match settings.auto_recalc_policy {
            AutoRecalcPolicy::OnRsvpChangeGroupOnly => {
                let guest = self
                    .storage
                    .get_guest(event_id, guest_id)?
                    .ok_or_else(|| {
                        SeatingError::NotFound(format!("Guest not found: {guest_id}"))
                    })?;
                let summary =
                    self.run_group_repack(event_id, AssignmentTrack::Real, &guest.group_key())?;
                Ok(RecalcOutcome::Group(summary))
            }
            AutoRecalcPolicy::OnRsvpChangeAll => {
                let summary = self.run_full_repack(event_id, AssignmentTrack::Real)?;
                Ok(RecalcOutcome::Full(summary))
            }
            AutoRecalcPolicy::ManualOnly => unreachable!("handled above"),
        }
    }

    // ========================================================================
    // Promotion and settings
    // ========================================================================

    /// Copy the simulation track onto the real track
    pub fn promote_simulation(&self, event_id: &str) -> SeatingResult<usize> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock();

        let moved = self.storage.promote(event_id)?;
        if moved == 0 {
            return Err(SeatingError::NoSimulationData);
        }
        tracing::info!(event_id, moved, "Simulation promoted to real");
        self.broadcast(
            event_id,
            SeatingChangeKind::SimulationPromoted { moved_count: moved },
        );
        Ok(moved)
    }

    /// Current settings, falling back to defaults when none are stored
    pub fn settings(&self, event_id: &str) -> SeatingResult<SeatingSettings> {
        Ok(self
            .storage
            .settings(event_id)?
            .unwrap_or_else(|| SeatingSettings::defaults_for(event_id)))
    }

    /// Apply a settings patch
    ///
    /// Switching auto to manual wipes both ledger tracks and all
    /// auto-generated tables; the caller owns confirming that with the
    /// user first.
    pub fn update_settings(
        &self,
        event_id: &str,
        patch: SeatingSettingsUpdate,
    ) -> SeatingResult<SeatingSettings> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock();

        let mut settings = self
            .storage
            .settings(event_id)?
            .unwrap_or_else(|| SeatingSettings::defaults_for(event_id));
        let was_auto = settings.mode == SeatingMode::Auto;
        settings.apply(patch);

        if !(1..=20).contains(&settings.seats_per_table) {
            return Err(SeatingError::Validation(format!(
                "seats_per_table must be between 1 and 20, got {}",
                settings.seats_per_table
            )));
        }

        if was_auto && settings.mode == SeatingMode::Manual {
            self.storage.purge_to_manual(event_id)?;
            tracing::info!(event_id, "Auto seating data purged on switch to manual");
        }
        self.storage.put_settings(&settings)?;
        self.broadcast(event_id, SeatingChangeKind::SettingsUpdated);
        Ok(settings)
    }

    /// Per-table assignment view for one track
    pub fn assignments(
        &self,
        event_id: &str,
        track: AssignmentTrack,
    ) -> SeatingResult<Vec<TableWithOccupants>> {
        if !self.storage.event_exists(event_id)? {
            return Err(SeatingError::NotFound(format!(
                "Event not found: {event_id}"
            )));
        }
        Ok(self.storage.assignments(event_id, track)?)
    }
}

#[cfg(test)]
mod tests;
