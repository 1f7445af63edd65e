//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use proptest::prelude::*;
use template_search::config::AppConfig;
use template_search::model::{AppModel, RowStore};
use template_search::persistence::{rows_to_json, MemoryStore};
use template_search::Session;

/// Config with small, predictable sizes
pub fn test_config() -> AppConfig {
    AppConfig {
        estimated_row_size: 4,
        overscan: 2,
        viewport_height: 10,
        key_width: 12,
        value_width: 20,
        storage_quota_bytes: None,
    }
}

/// Store built from (key, value) pairs
pub fn store(cells: &[(&str, &str)]) -> RowStore {
    RowStore::from_cells(
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
}

/// Model over (key, value) pairs with the test config
pub fn test_model(cells: &[(&str, &str)]) -> AppModel {
    AppModel::new(store(cells), &test_config())
}

/// The two-row table used throughout the search examples
pub fn fruit_model() -> AppModel {
    test_model(&[("apple pie", "dessert"), ("banana", "apple fritter")])
}

/// Session over an in-memory store; the handle shares state with the session
pub fn test_session(cells: &[(&str, &str)]) -> (Session, MemoryStore) {
    let json = rows_to_json(store(cells).rows()).expect("serialize seed rows");
    let handle = MemoryStore::with_json(json);
    let session = Session::open(&test_config(), Box::new(handle.clone()));
    (session, handle)
}

/// Lowercase words drawn from a small alphabet so queries hit often
pub fn arb_word() -> impl Strategy<Value = String> {
    "[a-d]{1,4}"
}

/// Plain cell text of a few words
pub fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 0..5).prop_map(|words| words.join(" "))
}

/// A table of up to `max` rows
pub fn arb_cells(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_text(), arb_text()), 0..max)
}

pub fn store_from_owned(cells: &[(String, String)]) -> RowStore {
    RowStore::from_cells(cells.iter().cloned())
}
