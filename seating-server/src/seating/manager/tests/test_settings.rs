//! Settings updates and the auto/manual transition

use super::*;
use crate::seating::SeatingError;
use shared::models::{SeatingMode, SeatingSettingsUpdate};

const EVENT: &str = "wedding-4";

#[test]
fn defaults_apply_when_nothing_is_stored() {
    let mgr = manager();

    let settings = mgr.settings(EVENT).unwrap();

    assert_eq!(settings.mode, SeatingMode::Auto);
    assert_eq!(settings.seats_per_table, 10);
    assert!(settings.avoid_singles_alone);
}

#[test]
fn seats_per_table_is_bounded() {
    let mgr = manager();

    for bad in [0, 21, 100] {
        let err = mgr
            .update_settings(
                EVENT,
                SeatingSettingsUpdate {
                    seats_per_table: Some(bad),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, SeatingError::Validation(_)), "{bad} accepted");
    }

    let updated = mgr
        .update_settings(
            EVENT,
            SeatingSettingsUpdate {
                seats_per_table: Some(20),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.seats_per_table, 20);
}

#[test]
fn rejected_update_is_not_persisted() {
    let mgr = manager();

    let _ = mgr.update_settings(
        EVENT,
        SeatingSettingsUpdate {
            seats_per_table: Some(0),
            ..Default::default()
        },
    );

    assert_eq!(mgr.settings(EVENT).unwrap().seats_per_table, 10);
}

#[test]
fn switching_to_manual_purges_auto_seating_data() {
    let mgr = manager();
    let storage = mgr.storage();
    storage.put_table(&table(EVENT, 1, 10)).unwrap();
    for (id, adults) in [("g-1", 8), ("g-2", 8)] {
        storage.put_guest(&guest(EVENT, id, None, adults, 0)).unwrap();
    }
    mgr.run_full_repack(EVENT, AssignmentTrack::Real).unwrap();
    mgr.run_full_repack(EVENT, AssignmentTrack::Simulation).unwrap();
    // One auto table was created next to the manual one
    assert_eq!(storage.tables(EVENT).unwrap().len(), 2);

    mgr.update_settings(
        EVENT,
        SeatingSettingsUpdate {
            mode: Some(SeatingMode::Manual),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(storage.ledger(EVENT, AssignmentTrack::Real).unwrap().is_empty());
    assert!(storage.ledger(EVENT, AssignmentTrack::Simulation).unwrap().is_empty());
    let tables = storage.tables(EVENT).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].origin, TableOrigin::Manual);
    assert!(tables[0].occupants.is_empty());
    assert!(
        storage
            .get_guest(EVENT, "g-1")
            .unwrap()
            .unwrap()
            .table_number
            .is_none()
    );
}

#[test]
fn switching_to_manual_without_auto_data_is_harmless() {
    let mgr = manager();
    mgr.storage().put_guest(&guest(EVENT, "g-1", None, 2, 0)).unwrap();

    let updated = mgr
        .update_settings(
            EVENT,
            SeatingSettingsUpdate {
                mode: Some(SeatingMode::Manual),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.mode, SeatingMode::Manual);
}

#[test]
fn changes_are_broadcast_to_subscribers() {
    let mgr = manager();
    let mut rx = mgr.subscribe();
    mgr.storage().put_guest(&guest(EVENT, "g-1", None, 2, 0)).unwrap();

    mgr.run_full_repack(EVENT, AssignmentTrack::Real).unwrap();
    mgr.update_settings(EVENT, SeatingSettingsUpdate::default()).unwrap();

    let first = rx.try_recv().unwrap();
    assert_eq!(first.event_id, EVENT);
    assert!(matches!(first.kind, SeatingChangeKind::PlanApplied { .. }));
    let second = rx.try_recv().unwrap();
    assert!(matches!(second.kind, SeatingChangeKind::SettingsUpdated));
}
