//! Application model - the complete state of the table
//!
//! The store is the only source of truth. Everything else here (scores,
//! display order, layout) is derived from `(store revision, query)` by
//! [`AppModel::refresh_view`].

mod row;
mod store;

pub use row::{CellAddress, Column, Row, StableIndex};
pub use store::{CellEdit, RowStore};

use crate::config::AppConfig;
use crate::search::{self, DisplayOrder, ScoredEntry};
use crate::view::TableViewport;
use crate::virtualizer::Virtualizer;

/// The complete application model
#[derive(Debug, Clone)]
pub struct AppModel {
    /// Canonical rows
    pub store: RowStore,
    /// Raw search input, as typed
    pub query: String,
    /// Ranked matches from the last search pass
    pub scored: Vec<ScoredEntry>,
    /// Row identities to show, in order
    pub display_order: DisplayOrder,
    /// Variable-height layout of the display order
    pub virtualizer: Virtualizer,
    pub viewport: TableViewport,
    /// Focused cell, by row identity
    pub active_cell: Option<CellAddress>,
    /// Inputs the derived view was last computed from
    view_key: Option<(u64, String)>,
}

impl AppModel {
    pub fn new(store: RowStore, config: &AppConfig) -> Self {
        let mut model = Self {
            store,
            query: String::new(),
            scored: Vec::new(),
            display_order: DisplayOrder::default(),
            virtualizer: Virtualizer::new(config.virtualizer_options()),
            viewport: TableViewport::new(config.viewport_height),
            active_cell: None,
            view_key: None,
        };
        model.refresh_view();
        model
    }

    /// Recompute scores, display order and layout keys
    ///
    /// A no-op when neither the store nor the query changed since the last
    /// call. Returns `true` when the view was recomputed.
    pub fn refresh_view(&mut self) -> bool {
        let key = (self.store.revision(), self.query.clone());
        if self.view_key.as_ref() == Some(&key) {
            return false;
        }

        self.scored = search::score(self.store.rows(), &self.query);
        self.display_order = search::project(self.store.len(), &self.query, &self.scored);
        self.virtualizer.set_keys(self.display_order.as_slice());
        self.viewport.clamp(&self.virtualizer);
        self.view_key = Some(key);

        tracing::debug!(
            target: "view",
            revision = self.store.revision(),
            query = %self.query,
            shown = self.display_order.len(),
            "view recomputed"
        );
        true
    }

    /// Display position of the focused cell, if its row is shown
    pub fn active_position(&self) -> Option<usize> {
        let cell = self.active_cell?;
        self.display_order.position_of(cell.id)
    }

    /// Row shown at a display position
    pub fn row_at(&self, position: usize) -> Option<&Row> {
        self.display_order
            .get(position)
            .and_then(|id| self.store.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> AppModel {
        let store = RowStore::from_cells(vec![
            ("apple pie".to_string(), "dessert".to_string()),
            ("banana".to_string(), "apple fritter".to_string()),
        ]);
        AppModel::new(store, &AppConfig::default())
    }

    #[test]
    fn test_new_shows_natural_order() {
        let model = model();
        assert_eq!(model.display_order, DisplayOrder::natural(2));
        assert_eq!(model.virtualizer.len(), 2);
    }

    #[test]
    fn test_refresh_view_is_memoised() {
        let mut model = model();
        assert!(!model.refresh_view());

        model.query = "banana".to_string();
        assert!(model.refresh_view());
        assert_eq!(model.display_order.as_slice(), &[StableIndex(1)]);
        assert!(!model.refresh_view());
    }

    #[test]
    fn test_row_at_and_active_position() {
        let mut model = model();
        model.query = "banana".to_string();
        model.refresh_view();

        assert_eq!(model.row_at(0).map(Row::id), Some(StableIndex(1)));
        assert!(model.row_at(1).is_none());

        model.active_cell = Some(CellAddress::new(StableIndex(0), Column::Key));
        assert_eq!(model.active_position(), None);
        model.active_cell = Some(CellAddress::new(StableIndex(1), Column::Key));
        assert_eq!(model.active_position(), Some(0));
    }
}
