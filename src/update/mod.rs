//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod data;
mod search;
mod table;
mod viewport;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::ViewSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use data::update_data;
pub use search::update_search;
pub use table::update_table;
pub use viewport::update_viewport;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Search(m) => search::update_search(model, m),
        Msg::Table(m) => table::update_table(model, m),
        Msg::Viewport(m) => viewport::update_viewport(model, m),
        Msg::Data(m) => data::update_data(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after view state and logs diffs for debugging.
/// Measurement feedback is too frequent to log.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::ViewportMsg;

    let is_noisy = matches!(&msg, Msg::Viewport(ViewportMsg::Measured { .. }));
    if is_noisy {
        return update_inner(model, msg);
    }

    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let before = ViewSnapshot::from_model(model);
    let result = update_inner(model, msg);
    let after = ViewSnapshot::from_model(model);

    if let Some(diff) = before.diff(&after) {
        debug!(target: "view", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Row payloads are summarised rather than dumped.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::DataMsg;

    match msg {
        Msg::Search(m) => format!("Search::{:?}", m),
        Msg::Table(m) => format!("Table::{:?}", m),
        Msg::Viewport(m) => format!("Viewport::{:?}", m),
        Msg::Data(DataMsg::ReplaceRows(rows)) => format!("Data::ReplaceRows({} rows)", rows.len()),
    }
}
