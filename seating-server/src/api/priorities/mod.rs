//! Group priority API module

mod handler;

use crate::core::ServerState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events/{event_id}/priorities", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{group_key}", put(handler::set))
}
