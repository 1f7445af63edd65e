//! Display order projection
//!
//! Decouples "no active query" from the scorer's filtering: an empty query
//! always shows every row in natural order.

use crate::model::StableIndex;

use super::scorer::{normalize_query, ScoredEntry};

/// Ordered sequence of row identities to show for the current query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOrder(Vec<StableIndex>);

impl DisplayOrder {
    /// Identity order `[0, 1, .., row_count - 1]`
    pub fn natural(row_count: usize) -> Self {
        Self((0..row_count).map(StableIndex).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[StableIndex] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = StableIndex> + '_ {
        self.0.iter().copied()
    }

    /// Row identity shown at a display position
    pub fn get(&self, position: usize) -> Option<StableIndex> {
        self.0.get(position).copied()
    }

    /// Display position of a row, if it is currently shown
    pub fn position_of(&self, id: StableIndex) -> Option<usize> {
        self.0.iter().position(|&shown| shown == id)
    }
}

impl From<Vec<StableIndex>> for DisplayOrder {
    fn from(ids: Vec<StableIndex>) -> Self {
        Self(ids)
    }
}

/// Combine natural order with ranked search results
pub fn project(row_count: usize, query: &str, scored: &[ScoredEntry]) -> DisplayOrder {
    if normalize_query(query).is_empty() {
        return DisplayOrder::natural(row_count);
    }
    DisplayOrder(scored.iter().map(|entry| entry.id).collect())
}
