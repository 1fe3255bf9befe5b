//! Guest API module

mod handler;

use crate::core::ServerState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events/{event_id}/guests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{guest_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{guest_id}/rsvp", post(handler::set_rsvp))
}
