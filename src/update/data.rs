//! Whole-table replacement

use crate::commands::Cmd;
use crate::messages::DataMsg;
use crate::model::AppModel;

/// Handle data messages
pub fn update_data(model: &mut AppModel, msg: DataMsg) -> Option<Cmd> {
    match msg {
        DataMsg::ReplaceRows(rows) => {
            let count = rows.len();
            model
                .store
                .replace_all(rows.into_iter().map(|row| (row.key, row.value)));

            // ids are reassigned, so old measurements describe other rows
            model.virtualizer.clear_measurements();
            model.active_cell = None;
            model.viewport.scroll_offset = 0;
            model.refresh_view();

            tracing::info!(rows = count, "table replaced");
            Some(Cmd::batch(vec![Cmd::PersistRows, Cmd::Redraw]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::import::ImportedRow;
    use crate::model::{CellAddress, Column, RowStore, StableIndex};

    #[test]
    fn test_replace_rows_resets_view() {
        let store = RowStore::from_cells(vec![("old".to_string(), "row".to_string())]);
        let mut model = AppModel::new(store, &AppConfig::default());
        model.virtualizer.report_measured_size(0, 12);
        model.active_cell = Some(CellAddress::new(StableIndex(0), Column::Key));

        let cmd = update_data(
            &mut model,
            DataMsg::ReplaceRows(vec![
                ImportedRow::new("a", "1"),
                ImportedRow::new("b", "2"),
            ]),
        );

        assert_eq!(cmd, Some(Cmd::batch(vec![Cmd::PersistRows, Cmd::Redraw])));
        assert_eq!(model.store.len(), 2);
        assert_eq!(model.display_order.len(), 2);
        assert!(model.active_cell.is_none());
        assert!(!model.virtualizer.is_measured(0));
    }

    #[test]
    fn test_replace_with_nothing() {
        let store = RowStore::from_cells(vec![("old".to_string(), "row".to_string())]);
        let mut model = AppModel::new(store, &AppConfig::default());
        update_data(&mut model, DataMsg::ReplaceRows(Vec::new()));
        assert!(model.store.is_empty());
        assert_eq!(model.virtualizer.total_extent(), 0);
    }
}
