//! Cell focus and edit updates
//!
//! Display positions are resolved to row identities here, before anything
//! touches the store.

use crate::commands::Cmd;
use crate::messages::TableMsg;
use crate::model::{AppModel, CellAddress};
use crate::view::index_map;

/// Handle table cell messages
pub fn update_table(model: &mut AppModel, msg: TableMsg) -> Option<Cmd> {
    match msg {
        TableMsg::FocusCell { position, column } => {
            let Some(cell) = index_map::cell_at(position, column, &model.display_order) else {
                tracing::debug!(position, "focus on position outside display order ignored");
                return None;
            };
            model.active_cell = Some(cell);
            model.viewport.ensure_visible(position, &model.virtualizer);
            Some(Cmd::Redraw)
        }
        TableMsg::EditCell {
            position,
            column,
            content,
        } => {
            let Some(cell) = index_map::cell_at(position, column, &model.display_order) else {
                tracing::warn!(position, "edit on position outside display order ignored");
                return None;
            };
            apply_edit(model, cell, content)
        }
        TableMsg::EditActiveCell(content) => {
            let Some(cell) = model.active_cell else {
                tracing::debug!("edit with no focused cell ignored");
                return None;
            };
            apply_edit(model, cell, content)
        }
        TableMsg::Blur => model.active_cell.take().map(|_| Cmd::Redraw),
    }
}

/// Write new content to a cell and bring the view up to date
///
/// The edited row's height may change, so its measurement is dropped. The
/// row may also enter or leave the filtered set.
fn apply_edit(model: &mut AppModel, cell: CellAddress, content: String) -> Option<Cmd> {
    let edit = model.store.update_cell(cell.id, cell.column, content)?;

    model.virtualizer.invalidate(edit.id);
    model.refresh_view();

    Some(Cmd::batch(vec![Cmd::PersistRows, Cmd::Redraw]))
}
