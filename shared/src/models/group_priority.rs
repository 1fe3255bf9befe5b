//! Group Priority Model

use serde::{Deserialize, Serialize};

/// Placement priority for a guest group
///
/// 0 = unranked; 1..N = placement order. At most one group per event holds
/// a given nonzero priority — assigning a duplicate demotes the previous
/// holder to 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupPriority {
    pub event_id: String,
    pub group_key: String,
    pub priority: u32,
}
