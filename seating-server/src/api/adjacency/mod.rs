//! Table adjacency API module

mod handler;

use crate::core::ServerState;
use axum::{
    Router,
    routing::{delete, get},
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events/{event_id}/adjacency", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{table_a}/{table_b}", delete(handler::delete))
}
