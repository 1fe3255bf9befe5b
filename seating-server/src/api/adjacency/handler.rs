//! Table adjacency API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{AdjacencyCreate, TableAdjacency};

use crate::core::ServerState;
use crate::directory::AdjacencyRepository;
use crate::utils::AppResult;

/// GET /api/events/{event_id}/adjacency
pub async fn list(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<TableAdjacency>>> {
    let repo = AdjacencyRepository::new(state.storage().clone());
    Ok(Json(repo.list(&event_id)?))
}

/// POST /api/events/{event_id}/adjacency
pub async fn create(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Json(payload): Json<AdjacencyCreate>,
) -> AppResult<Json<TableAdjacency>> {
    let repo = AdjacencyRepository::new(state.storage().clone());
    Ok(Json(repo.create(&event_id, payload)?))
}

/// DELETE /api/events/{event_id}/adjacency/{table_a}/{table_b}
pub async fn delete(
    State(state): State<ServerState>,
    Path((event_id, table_a, table_b)): Path<(String, u32, u32)>,
) -> AppResult<Json<bool>> {
    let repo = AdjacencyRepository::new(state.storage().clone());
    Ok(Json(repo.delete(&event_id, table_a, table_b)?))
}
