//! Row store
//!
//! Owns the canonical, insertion-ordered collection of rows. The only
//! mutation path for cell content is [`RowStore::update_cell`], which swaps
//! content and derived text in one step.

use super::row::{Column, Row, StableIndex};

/// A completed cell edit, returned from [`RowStore::update_cell`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub id: StableIndex,
    pub column: Column,
    pub old_content: String,
    pub new_content: String,
}

/// Ordered collection of rows, indexed by [`StableIndex`]
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    /// Bumped on every mutation; part of the view's version token
    revision: u64,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` markup pairs, assigning ids in order
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let rows = cells
            .into_iter()
            .enumerate()
            .map(|(i, (key, value))| Row::new(StableIndex(i), key, value))
            .collect();
        Self { rows, revision: 0 }
    }

    /// Build a store from rows loaded elsewhere, renumbering them in order
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::from_cells(rows.into_iter().map(Row::into_content))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, id: StableIndex) -> Option<&Row> {
        self.rows.get(id.get())
    }

    pub fn contains(&self, id: StableIndex) -> bool {
        id.get() < self.rows.len()
    }

    /// Replace a cell's content, re-deriving its plain text
    ///
    /// Returns `None` when `id` does not exist or the content is unchanged.
    pub fn update_cell(
        &mut self,
        id: StableIndex,
        column: Column,
        content: String,
    ) -> Option<CellEdit> {
        let Some(row) = self.rows.get_mut(id.get()) else {
            tracing::warn!(%id, column = column.label(), "edit for unknown row ignored");
            return None;
        };

        if row.content(column) == content {
            return None;
        }

        let new_content = content.clone();
        let old_content = row.replace_content(column, content);
        self.revision += 1;

        tracing::debug!(%id, column = column.label(), revision = self.revision, "cell updated");

        Some(CellEdit {
            id,
            column,
            old_content,
            new_content,
        })
    }

    /// Swap in a whole new collection (e.g. after an import)
    pub fn replace_all<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let revision = self.revision + 1;
        *self = Self::from_cells(cells);
        self.revision = revision;
    }
}
