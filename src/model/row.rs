//! Row types
//!
//! A row is one key/value record. Its content is rich-text markup; the plain
//! text used for searching is derived from that content and is only ever
//! produced here, so the two can never drift apart.

use std::fmt;

use crate::richtext;

/// A row's permanent identity: its position in the store's canonical order
///
/// Distinct from a display position, which depends on the active query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StableIndex(pub usize);

impl StableIndex {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for StableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for StableIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// The two columns of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Key,
    Value,
}

impl Column {
    pub fn label(self) -> &'static str {
        match self {
            Column::Key => "key",
            Column::Value => "value",
        }
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "key" | "item" => Ok(Column::Key),
            "value" | "body" => Ok(Column::Value),
            other => Err(format!("unknown column '{}' (expected key or value)", other)),
        }
    }
}

/// Address of a single cell by row identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub id: StableIndex,
    pub column: Column,
}

impl CellAddress {
    pub fn new(id: StableIndex, column: Column) -> Self {
        Self { id, column }
    }
}

/// One key/value record with its derived plain-text projection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    id: StableIndex,
    key_content: String,
    value_content: String,
    key_text: String,
    value_text: String,
}

impl Row {
    /// Build a row, deriving both text caches from the content
    pub fn new(id: StableIndex, key_content: String, value_content: String) -> Self {
        let key_text = richtext::plain_text(&key_content);
        let value_text = richtext::plain_text(&value_content);
        Self {
            id,
            key_content,
            value_content,
            key_text,
            value_text,
        }
    }

    pub fn id(&self) -> StableIndex {
        self.id
    }

    pub fn key_content(&self) -> &str {
        &self.key_content
    }

    pub fn value_content(&self) -> &str {
        &self.value_content
    }

    pub fn key_text(&self) -> &str {
        &self.key_text
    }

    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    pub fn content(&self, column: Column) -> &str {
        match column {
            Column::Key => &self.key_content,
            Column::Value => &self.value_content,
        }
    }

    pub fn text(&self, column: Column) -> &str {
        match column {
            Column::Key => &self.key_text,
            Column::Value => &self.value_text,
        }
    }

    /// Take the row apart into its `(key, value)` markup
    pub fn into_content(self) -> (String, String) {
        (self.key_content, self.value_content)
    }

    /// Replace a cell's content and its derived text together
    ///
    /// Returns the previous content.
    pub(crate) fn replace_content(&mut self, column: Column, content: String) -> String {
        let text = richtext::plain_text(&content);
        match column {
            Column::Key => {
                self.key_text = text;
                std::mem::replace(&mut self.key_content, content)
            }
            Column::Value => {
                self.value_text = text;
                std::mem::replace(&mut self.value_content, content)
            }
        }
    }
}
