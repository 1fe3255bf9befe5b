//! Real/simulation track isolation and promotion

use super::*;
use crate::seating::SeatingError;

const EVENT: &str = "wedding-3";

#[test]
fn tracks_are_packed_and_stored_independently() {
    let mgr = manager();
    let storage = mgr.storage();
    storage.put_guest(&guest(EVENT, "g-yes", None, 4, 0)).unwrap();
    let pending = Guest {
        rsvp: RsvpStatus::Pending,
        ..guest(EVENT, "g-maybe", None, 2, 0)
    };
    storage.put_guest(&pending).unwrap();

    mgr.run_full_repack(EVENT, AssignmentTrack::Real).unwrap();
    mgr.run_full_repack(EVENT, AssignmentTrack::Simulation).unwrap();

    // Real counts full attendance; simulation holds one provisional seat
    // for the undecided guest
    let real = mgr.storage().ledger(EVENT, AssignmentTrack::Real).unwrap();
    let sim = mgr.storage().ledger(EVENT, AssignmentTrack::Simulation).unwrap();
    let real_maybe = real.iter().find(|r| r.guest_id == "g-maybe").unwrap();
    let sim_maybe = sim.iter().find(|r| r.guest_id == "g-maybe").unwrap();
    assert_eq!(real_maybe.seats, 2);
    assert_eq!(sim_maybe.seats, 1);
}

#[test]
fn simulation_repack_leaves_real_caches_untouched() {
    let mgr = manager();
    let storage = mgr.storage();
    storage.put_guest(&guest(EVENT, "g-1", None, 4, 0)).unwrap();
    mgr.run_full_repack(EVENT, AssignmentTrack::Real).unwrap();
    let before: Vec<SeatingTable> = storage.tables(EVENT).unwrap();
    assert!(before.iter().any(|t| !t.occupants.is_empty()));

    mgr.run_full_repack(EVENT, AssignmentTrack::Simulation).unwrap();

    assert_eq!(storage.tables(EVENT).unwrap(), before);
    assert_eq!(
        storage.get_guest(EVENT, "g-1").unwrap().unwrap().table_number,
        before[0].occupants.first().map(|_| before[0].number)
    );
}

#[test]
fn declined_guests_are_left_out() {
    let mgr = manager();
    let storage = mgr.storage();
    storage.put_guest(&guest(EVENT, "g-yes", None, 2, 0)).unwrap();
    let declined = Guest {
        rsvp: RsvpStatus::Declined,
        ..guest(EVENT, "g-no", None, 2, 0)
    };
    storage.put_guest(&declined).unwrap();

    mgr.run_full_repack(EVENT, AssignmentTrack::Real).unwrap();

    assert_eq!(table_of(&mgr, EVENT, AssignmentTrack::Real, "g-no"), None);
    assert!(table_of(&mgr, EVENT, AssignmentTrack::Real, "g-yes").is_some());
}

#[test]
fn promotion_replaces_the_real_track() {
    let mgr = manager();
    let storage = mgr.storage();
    storage.put_guest(&guest(EVENT, "g-1", None, 3, 0)).unwrap();
    storage.put_guest(&guest(EVENT, "g-2", None, 2, 0)).unwrap();
    mgr.run_full_repack(EVENT, AssignmentTrack::Simulation).unwrap();
    assert!(storage.ledger(EVENT, AssignmentTrack::Real).unwrap().is_empty());

    let moved = mgr.promote_simulation(EVENT).unwrap();

    assert_eq!(moved, 2);
    let real = storage.ledger(EVENT, AssignmentTrack::Real).unwrap();
    let sim = storage.ledger(EVENT, AssignmentTrack::Simulation).unwrap();
    assert_eq!(real.len(), 2);
    for (r, s) in real.iter().zip(sim.iter()) {
        assert_eq!(r.guest_id, s.guest_id);
        assert_eq!(r.table_number, s.table_number);
        assert_eq!(r.seats, s.seats);
        assert_eq!(r.track, AssignmentTrack::Real);
    }
    // Promotion rebuilds the real-track caches
    assert!(
        storage
            .get_guest(EVENT, "g-1")
            .unwrap()
            .unwrap()
            .table_number
            .is_some()
    );
}

#[test]
fn promotion_without_simulation_data_fails() {
    let mgr = manager();
    mgr.storage().put_guest(&guest(EVENT, "g-1", None, 2, 0)).unwrap();

    let err = mgr.promote_simulation(EVENT).unwrap_err();

    assert!(matches!(err, SeatingError::NoSimulationData));
}

#[test]
fn cache_listed_guest_without_ledger_row_falls_back_to_attendance() {
    let mgr = manager();
    let storage = mgr.storage();
    storage.put_guest(&guest(EVENT, "g-1", None, 3, 1)).unwrap();
    let mut seated = table(EVENT, 1, 10);
    seated.occupants = vec!["g-1".to_string()];
    storage.put_table(&seated).unwrap();

    let tables = mgr.assignments(EVENT, AssignmentTrack::Real).unwrap();

    assert_eq!(tables[0].occupants.len(), 1);
    assert_eq!(tables[0].occupants[0].seats, 4);
    assert_eq!(tables[0].seats_total, 4);
}

#[test]
fn assignments_for_unknown_event_is_not_found() {
    let mgr = manager();

    let err = mgr.assignments("nowhere", AssignmentTrack::Real).unwrap_err();

    assert!(matches!(err, SeatingError::NotFound(_)));
}
