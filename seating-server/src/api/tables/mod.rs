//! Seating table API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events/{event_id}/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{number}",
            get(handler::get_by_number)
                .put(handler::update)
                .delete(handler::delete),
        )
}
