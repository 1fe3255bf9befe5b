//! Seating engine API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{AssignmentTrack, SeatingSettings, SeatingSettingsUpdate};

use crate::core::ServerState;
use crate::seating::manager::{PlacementSummary, RecalcState};
use crate::seating::storage::TableWithOccupants;
use crate::utils::AppResult;

#[derive(Deserialize)]
pub struct TrackQuery {
    track: Option<AssignmentTrack>,
}

impl TrackQuery {
    fn track(&self) -> AssignmentTrack {
        self.track.unwrap_or(AssignmentTrack::Real)
    }
}

/// POST /api/events/{event_id}/seating/repack?track=
pub async fn repack(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<PlacementSummary>> {
    let summary = state.manager.run_full_repack(&event_id, query.track())?;
    Ok(Json(summary))
}

/// POST /api/events/{event_id}/seating/groups/{group_key}/repack?track=
pub async fn repack_group(
    State(state): State<ServerState>,
    Path((event_id, group_key)): Path<(String, String)>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<PlacementSummary>> {
    let summary = state
        .manager
        .run_group_repack(&event_id, query.track(), &group_key)?;
    Ok(Json(summary))
}

/// GET /api/events/{event_id}/seating/assignments?track=
pub async fn assignments(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<Vec<TableWithOccupants>>> {
    Ok(Json(state.manager.assignments(&event_id, query.track())?))
}

#[derive(Serialize)]
pub struct PromoteResponse {
    pub moved_count: usize,
}

/// POST /api/events/{event_id}/seating/promote
pub async fn promote(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<PromoteResponse>> {
    let moved_count = state.manager.promote_simulation(&event_id)?;
    Ok(Json(PromoteResponse { moved_count }))
}

/// GET /api/events/{event_id}/seating/settings
pub async fn get_settings(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<SeatingSettings>> {
    Ok(Json(state.manager.settings(&event_id)?))
}

/// PUT /api/events/{event_id}/seating/settings
///
/// Switching auto to manual is destructive: both tracks and all auto
/// tables are purged.
pub async fn update_settings(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    Json(payload): Json<SeatingSettingsUpdate>,
) -> AppResult<Json<SeatingSettings>> {
    Ok(Json(state.manager.update_settings(&event_id, payload)?))
}

/// GET /api/events/{event_id}/seating/state
pub async fn state(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<RecalcState>> {
    Ok(Json(state.manager.state(&event_id)?))
}
