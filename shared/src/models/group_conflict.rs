//! Group Conflict Model

use serde::{Deserialize, Serialize};

/// Keep-apart declaration between two guest groups
///
/// Under `adjacency_policy = ForbidSameAndAdjacent` the pair may not share
/// a table nor sit at two adjacent tables. Persisted as two directed rows
/// like [`super::TableAdjacency`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConflict {
    pub event_id: String,
    pub group_a: String,
    pub group_b: String,
}

/// Create conflict payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCreate {
    pub group_a: String,
    pub group_b: String,
}
