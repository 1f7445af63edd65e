//! Scroll, resize and measurement updates

use crate::commands::Cmd;
use crate::messages::ViewportMsg;
use crate::model::AppModel;

/// Handle viewport messages
pub fn update_viewport(model: &mut AppModel, msg: ViewportMsg) -> Option<Cmd> {
    let before = model.viewport;

    match msg {
        ViewportMsg::ScrollTo(offset) => model.viewport.scroll_to(offset, &model.virtualizer),
        ViewportMsg::ScrollBy(delta) => model.viewport.scroll_by(delta, &model.virtualizer),
        ViewportMsg::Resize(height) => model.viewport.resize(height, &model.virtualizer),
        ViewportMsg::RevealPosition(position) => {
            model.viewport.ensure_visible(position, &model.virtualizer)
        }
        ViewportMsg::Measured { position, size } => {
            if !model.virtualizer.report_measured_size(position, size) {
                return None;
            }
            // the extent may have shrunk below the current offset
            model.viewport.clamp(&model.virtualizer);
            return Some(Cmd::Redraw);
        }
    }

    (model.viewport != before).then_some(Cmd::Redraw)
}
