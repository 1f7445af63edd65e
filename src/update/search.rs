//! Search query updates

use crate::commands::Cmd;
use crate::messages::SearchMsg;
use crate::model::AppModel;

/// Handle search box messages
///
/// Every query change recomputes the view synchronously; the last applied
/// query always wins.
pub fn update_search(model: &mut AppModel, msg: SearchMsg) -> Option<Cmd> {
    match msg {
        SearchMsg::SetQuery(query) => set_query(model, query),
        SearchMsg::Clear => set_query(model, String::new()),
    }
}

fn set_query(model: &mut AppModel, query: String) -> Option<Cmd> {
    if model.query == query {
        return None;
    }

    model.query = query;
    model.viewport.scroll_offset = 0;
    model.refresh_view();
    Some(Cmd::Redraw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::{RowStore, StableIndex};

    fn model() -> AppModel {
        let store = RowStore::from_cells(vec![
            ("apple pie".to_string(), "dessert".to_string()),
            ("banana".to_string(), "apple fritter".to_string()),
        ]);
        AppModel::new(store, &AppConfig::default())
    }

    #[test]
    fn test_set_query_ranks_rows() {
        let mut model = model();
        let cmd = update_search(&mut model, SearchMsg::SetQuery("fritter".to_string()));
        assert_eq!(cmd, Some(Cmd::Redraw));
        assert_eq!(model.display_order.as_slice(), &[StableIndex(1)]);
    }

    #[test]
    fn test_same_query_is_noop() {
        let mut model = model();
        update_search(&mut model, SearchMsg::SetQuery("apple".to_string()));
        assert_eq!(
            update_search(&mut model, SearchMsg::SetQuery("apple".to_string())),
            None
        );
    }

    #[test]
    fn test_clear_restores_natural_order() {
        let mut model = model();
        update_search(&mut model, SearchMsg::SetQuery("banana".to_string()));
        update_search(&mut model, SearchMsg::Clear);
        assert_eq!(
            model.display_order.as_slice(),
            &[StableIndex(0), StableIndex(1)]
        );
    }
}
