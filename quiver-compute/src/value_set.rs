use rustc_hash::FxHashSet;

use crate::scalar::ScalarValue;

/// Content-based membership tracking for distinct-wrapped aggregations.
///
/// Backed by a hash set over [`ScalarValue`], so binary values are
/// deduplicated by byte content and floats by bit pattern, never by
/// reference identity.
#[derive(Debug, Default)]
pub struct DistinctValueSet {
    seen: FxHashSet<ScalarValue>,
}

impl DistinctValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; returns true iff it was not seen before.
    pub fn insert(&mut self, value: ScalarValue) -> bool {
        self.seen.insert(value)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
