//! Keep-apart policy
//!
//! Which guest groups must not share (or neighbor) a table is not fixed by
//! the data model, so the packing core only sees this trait. The default
//! source is the explicit per-pair conflict list; `AllFamiliesApart` covers
//! the stricter every-family-pairwise reading.

use std::collections::HashSet;

/// Declares which pairs of groups must be kept apart
pub trait SeparationPolicy: Send + Sync {
    fn must_separate(&self, a: &str, b: &str) -> bool;
}

/// Explicit conflict list (the default source)
///
/// Backed by persisted `GroupConflict` rows; symmetric lookup regardless of
/// the direction pairs were inserted in.
#[derive(Debug, Default, Clone)]
pub struct ExplicitConflicts {
    pairs: HashSet<(String, String)>,
}

impl ExplicitConflicts {
    pub fn new(pairs: HashSet<(String, String)>) -> Self {
        let mut all = HashSet::with_capacity(pairs.len() * 2);
        for (a, b) in pairs {
            all.insert((b.clone(), a.clone()));
            all.insert((a, b));
        }
        Self { pairs: all }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl SeparationPolicy for ExplicitConflicts {
    fn must_separate(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&(a.to_string(), b.to_string()))
    }
}

/// Every distinct group is kept apart from every other
///
/// Alternative semantics for `adjacency_policy`; not the default, but
/// swappable without touching the packing core.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllFamiliesApart;

impl SeparationPolicy for AllFamiliesApart {
    fn must_separate(&self, a: &str, b: &str) -> bool {
        a != b
    }
}
