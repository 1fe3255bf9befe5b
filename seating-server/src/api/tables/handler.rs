//! Seating table API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{SeatingTable, SeatingTableCreate, SeatingTableUpdate};

use crate::core::ServerState;
use crate::directory::TableRepository;
use crate::utils::AppResult;

/// GET /api/events/{event_id}/tables
pub async fn list(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<SeatingTable>>> {
    let repo = TableRepository::new(state.storage().clone());
    Ok(Json(repo.list(&event_id)?))
}

/// GET /api/events/{event_id}/tables/{number}
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path((event_id, number)): Path<(String, u32)>,
) -> AppResult<Json<SeatingTable>> {
    let repo = TableRepository::new(state.storage().clone());
    Ok(Json(repo.get(&event_id, number)?))
}

/// POST /api/events/{event_id}/tables
pub async fn create(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Json(payload): Json<SeatingTableCreate>,
) -> AppResult<Json<SeatingTable>> {
    let repo = TableRepository::new(state.storage().clone());
    Ok(Json(repo.create(&event_id, payload)?))
}

/// PUT /api/events/{event_id}/tables/{number}
pub async fn update(
    State(state): State<ServerState>,
    Path((event_id, number)): Path<(String, u32)>,
    Json(payload): Json<SeatingTableUpdate>,
) -> AppResult<Json<SeatingTable>> {
    let repo = TableRepository::new(state.storage().clone());
    Ok(Json(repo.update(&event_id, number, payload)?))
}

/// DELETE /api/events/{event_id}/tables/{number}
pub async fn delete(
    State(state): State<ServerState>,
    Path((event_id, number)): Path<(String, u32)>,
) -> AppResult<Json<bool>> {
    let repo = TableRepository::new(state.storage().clone());
    Ok(Json(repo.delete(&event_id, number)?))
}
