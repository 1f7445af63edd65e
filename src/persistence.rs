//! Row persistence
//!
//! The table is stored as a JSON array of
//! `{ "key", "value", "keyText", "valueText" }` objects. Loading is lenient:
//! a missing or malformed file yields an empty table, missing or `null`
//! fields default to empty strings, and the text fields are always re-derived
//! from the markup rather than trusted.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::{Row, StableIndex};

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage quota exceeded: {size} bytes (limit {quota})")]
    QuotaExceeded { size: u64, quota: u64 },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the row collection lives between sessions
pub trait RowPersistence {
    /// Rows from the last session; empty when nothing usable is stored
    fn load(&self) -> Vec<Row>;

    /// Replace the stored collection with `rows`
    fn store(&mut self, rows: &[Row]) -> Result<(), PersistError>;
}

/// On-disk shape of one row
///
/// Missing and `null` fields both read as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRow {
    #[serde(default, deserialize_with = "null_as_empty")]
    key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    value: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    key_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    value_text: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&Row> for StoredRow {
    fn from(row: &Row) -> Self {
        Self {
            key: row.key_content().to_string(),
            value: row.value_content().to_string(),
            key_text: row.key_text().to_string(),
            value_text: row.value_text().to_string(),
        }
    }
}

/// Serialize rows to the stored JSON shape
pub fn rows_to_json(rows: &[Row]) -> Result<String, PersistError> {
    let stored: Vec<StoredRow> = rows.iter().map(StoredRow::from).collect();
    Ok(serde_json::to_string(&stored)?)
}

/// Parse stored JSON leniently into `(key, value)` markup pairs
///
/// A document that is not a JSON array yields an empty table.
pub fn cells_from_json(json: &str) -> Vec<(String, String)> {
    parse_cells(json).unwrap_or_else(|e| {
        tracing::warn!("Stored table is not a JSON array, ignoring it: {}", e);
        Vec::new()
    })
}

/// Parse a JSON array of stored rows into `(key, value)` markup pairs
///
/// Fails only when the document is not an array. Entries that are not
/// objects, or whose fields are neither strings nor `null`, are skipped with
/// a warning.
pub fn parse_cells(json: &str) -> Result<Vec<(String, String)>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let total = entries.len();
    let cells: Vec<(String, String)> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<StoredRow>(entry).ok())
        .map(|stored| (stored.key, stored.value))
        .collect();

    if cells.len() != total {
        tracing::warn!(
            "Skipped {} malformed entries in stored table",
            total - cells.len()
        );
    }
    Ok(cells)
}

fn rows_from_cells(cells: Vec<(String, String)>) -> Vec<Row> {
    cells
        .into_iter()
        .enumerate()
        .map(|(i, (key, value))| Row::new(StableIndex(i), key, value))
        .collect()
}

/// JSON file in the config directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    quota_bytes: Option<u64>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, quota_bytes: Option<u64>) -> Self {
        Self {
            path: path.into(),
            quota_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowPersistence for JsonFileStore {
    fn load(&self) -> Vec<Row> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No stored table at {}", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read stored table {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let rows = rows_from_cells(cells_from_json(&contents));
        tracing::info!("Loaded {} rows from {}", rows.len(), self.path.display());
        rows
    }

    fn store(&mut self, rows: &[Row]) -> Result<(), PersistError> {
        let json = rows_to_json(rows)?;
        let size = json.len() as u64;
        if let Some(quota) = self.quota_bytes {
            if size > quota {
                return Err(PersistError::QuotaExceeded { size, quota });
            }
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;

        tracing::debug!(rows = rows.len(), bytes = size, "stored table");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    json: Option<String>,
    writes: usize,
    failing: bool,
}

/// In-memory persistence for tests and `--no-persist` sessions
///
/// Clones share the same storage, so a test can keep a handle while a
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with raw JSON, as if written by an earlier session
    pub fn with_json(json: impl Into<String>) -> Self {
        let store = Self::default();
        store.state.borrow_mut().json = Some(json.into());
        store
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    /// The stored collection as `(key, value)` markup pairs
    pub fn stored_cells(&self) -> Vec<(String, String)> {
        self.state
            .borrow()
            .json
            .as_deref()
            .map(cells_from_json)
            .unwrap_or_default()
    }
}

impl RowPersistence for MemoryStore {
    fn load(&self) -> Vec<Row> {
        rows_from_cells(self.stored_cells())
    }

    fn store(&mut self, rows: &[Row]) -> Result<(), PersistError> {
        let mut state = self.state.borrow_mut();
        if state.failing {
            return Err(PersistError::Unavailable("simulated write failure".to_string()));
        }
        state.json = Some(rows_to_json(rows)?);
        state.writes += 1;
        Ok(())
    }
}
