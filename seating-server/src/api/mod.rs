//! HTTP API
//!
//! All event-scoped resources nest under `/api/events/{event_id}/...`;
//! each resource module exposes its own `router()`.

pub mod adjacency;
pub mod conflicts;
pub mod guests;
pub mod health;
pub mod priorities;
pub mod seating;
pub mod tables;

use crate::core::ServerState;
use axum::Router;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(guests::router())
        .merge(tables::router())
        .merge(adjacency::router())
        .merge(priorities::router())
        .merge(conflicts::router())
        .merge(seating::router())
}
