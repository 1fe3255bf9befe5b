//! Table Adjacency Model

use serde::{Deserialize, Serialize};

/// Table adjacency edge
///
/// An unordered pair of tables declared physically adjacent. Persisted as
/// two directed rows (a→b and b→a) so lookups are symmetric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableAdjacency {
    pub event_id: String,
    pub table_a: u32,
    pub table_b: u32,
}

/// Create adjacency payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyCreate {
    pub table_a: u32,
    pub table_b: u32,
}
