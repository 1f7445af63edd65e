//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Anything raised from
//! the rendered table carries a display position; it is resolved to a row
//! identity inside `update`, never by the sender.

use crate::import::ImportedRow;
use crate::model::Column;

/// Search box messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMsg {
    /// Replace the query (every keystroke; no debouncing)
    SetQuery(String),
    /// Empty the query, showing every row in natural order
    Clear,
}

/// Table cell messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableMsg {
    /// Focus a cell at a display position
    FocusCell { position: usize, column: Column },
    /// Replace a cell's rich content at a display position
    EditCell {
        position: usize,
        column: Column,
        content: String,
    },
    /// Replace the focused cell's rich content (editor change callback)
    EditActiveCell(String),
    /// Drop focus
    Blur,
}

/// Scrolling and layout feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportMsg {
    /// Scroll to an absolute offset
    ScrollTo(u64),
    /// Scroll by a relative amount (positive = down)
    ScrollBy(i64),
    /// Viewport height changed
    Resize(u32),
    /// A rendered position's real size
    Measured { position: usize, size: u32 },
    /// Scroll just enough to show a display position
    RevealPosition(usize),
}

/// Table data replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMsg {
    /// Replace every row with an import result
    ReplaceRows(Vec<ImportedRow>),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Search(SearchMsg),
    Table(TableMsg),
    Viewport(ViewportMsg),
    Data(DataMsg),
}
