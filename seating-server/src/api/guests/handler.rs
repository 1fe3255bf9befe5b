//! Guest API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Guest, GuestCreate, GuestUpdate, RsvpStatus};

use crate::core::ServerState;
use crate::directory::GuestRepository;
use crate::seating::RecalcOutcome;
use crate::utils::AppResult;

/// GET /api/events/{event_id}/guests
pub async fn list(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<Guest>>> {
    let repo = GuestRepository::new(state.storage().clone());
    Ok(Json(repo.list(&event_id)?))
}

/// GET /api/events/{event_id}/guests/{guest_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((event_id, guest_id)): Path<(String, String)>,
) -> AppResult<Json<Guest>> {
    let repo = GuestRepository::new(state.storage().clone());
    Ok(Json(repo.get(&event_id, &guest_id)?))
}

/// POST /api/events/{event_id}/guests
pub async fn create(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Json(payload): Json<GuestCreate>,
) -> AppResult<Json<Guest>> {
    let repo = GuestRepository::new(state.storage().clone());
    Ok(Json(repo.create(&event_id, payload)?))
}

/// PUT /api/events/{event_id}/guests/{guest_id}
pub async fn update(
    State(state): State<ServerState>,
    Path((event_id, guest_id)): Path<(String, String)>,
    Json(payload): Json<GuestUpdate>,
) -> AppResult<Json<Guest>> {
    let repo = GuestRepository::new(state.storage().clone());
    Ok(Json(repo.update(&event_id, &guest_id, payload)?))
}

/// DELETE /api/events/{event_id}/guests/{guest_id}
pub async fn delete(
    State(state): State<ServerState>,
    Path((event_id, guest_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let repo = GuestRepository::new(state.storage().clone());
    Ok(Json(repo.delete(&event_id, &guest_id)?))
}

#[derive(Deserialize)]
pub struct RsvpChange {
    pub rsvp: RsvpStatus,
}

#[derive(Serialize)]
pub struct RsvpChangeResponse {
    pub guest: Guest,
    /// What the coordinator did in response, per the event's policy
    pub recalc: RecalcOutcome,
}

/// POST /api/events/{event_id}/guests/{guest_id}/rsvp
///
/// Persists the new status, then lets the coordinator decide whether a
/// group-scoped or full recalculation runs.
pub async fn set_rsvp(
    State(state): State<ServerState>,
    Path((event_id, guest_id)): Path<(String, String)>,
    Json(payload): Json<RsvpChange>,
) -> AppResult<Json<RsvpChangeResponse>> {
    let repo = GuestRepository::new(state.storage().clone());
    let guest = repo.set_rsvp(&event_id, &guest_id, payload.rsvp)?;
    let recalc = state.manager.rsvp_changed(&event_id, &guest_id)?;
    // The guest row may have gained a table number during the recalc
    let guest = repo.get(&event_id, &guest_id).unwrap_or(guest);
    Ok(Json(RsvpChangeResponse { guest, recalc }))
}
