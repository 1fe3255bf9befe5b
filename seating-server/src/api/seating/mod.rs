//! Seating engine API module
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /seating/repack | POST | Full repack of one track |
//! | /seating/groups/{group_key}/repack | POST | Group-scoped repack |
//! | /seating/assignments | GET | Per-table view of one track |
//! | /seating/promote | POST | Copy simulation onto real |
//! | /seating/settings | GET/PUT | Per-event settings |
//! | /seating/state | GET | Coordinator state |
//!
//! Track selection uses the `track` query parameter (`REAL` default,
//! `SIMULATION` for drafts).

mod handler;

use crate::core::ServerState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events/{event_id}/seating", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/repack", post(handler::repack))
        .route("/groups/{group_key}/repack", post(handler::repack_group))
        .route("/assignments", get(handler::assignments))
        .route("/promote", post(handler::promote))
        .route("/settings", get(handler::get_settings).put(handler::update_settings))
        .route("/state", get(handler::state))
}
