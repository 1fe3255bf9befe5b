//! Group conflict API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ConflictCreate, GroupConflict};

use crate::core::ServerState;
use crate::directory::ConflictRepository;
use crate::utils::AppResult;

/// GET /api/events/{event_id}/conflicts
pub async fn list(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<GroupConflict>>> {
    let repo = ConflictRepository::new(state.storage().clone());
    Ok(Json(repo.list(&event_id)?))
}

/// POST /api/events/{event_id}/conflicts
pub async fn create(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Json(payload): Json<ConflictCreate>,
) -> AppResult<Json<GroupConflict>> {
    let repo = ConflictRepository::new(state.storage().clone());
    Ok(Json(repo.create(&event_id, &payload.group_a, &payload.group_b)?))
}

/// DELETE /api/events/{event_id}/conflicts/{group_a}/{group_b}
pub async fn delete(
    State(state): State<ServerState>,
    Path((event_id, group_a, group_b)): Path<(String, String, String)>,
) -> AppResult<Json<bool>> {
    let repo = ConflictRepository::new(state.storage().clone());
    Ok(Json(repo.delete(&event_id, &group_a, &group_b)?))
}
