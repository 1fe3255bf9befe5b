//! Group priority API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::GroupPriority;

use crate::core::ServerState;
use crate::directory::PriorityRepository;
use crate::utils::AppResult;

/// GET /api/events/{event_id}/priorities
pub async fn list(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<GroupPriority>>> {
    let repo = PriorityRepository::new(state.storage().clone());
    Ok(Json(repo.list(&event_id)?))
}

#[derive(Deserialize)]
pub struct PrioritySet {
    pub priority: u32,
}

/// PUT /api/events/{event_id}/priorities/{group_key}
///
/// Priority 0 removes the ranking; a duplicate nonzero priority demotes
/// its previous holder.
pub async fn set(
    State(state): State<ServerState>,
    Path((event_id, group_key)): Path<(String, String)>,
    Json(payload): Json<PrioritySet>,
) -> AppResult<Json<GroupPriority>> {
    let repo = PriorityRepository::new(state.storage().clone());
    Ok(Json(repo.set(&event_id, &group_key, payload.priority)?))
}
