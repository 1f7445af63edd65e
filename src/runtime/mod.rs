//! Session runtime
//!
//! Owns the model, runs messages through `update`, and performs the side
//! effects the returned commands ask for. Also drives the render/measure
//! loop: rows are laid out with their best-known size, measured, and the
//! measurements fed back until the layout stops moving.

use crate::commands::Cmd;
use crate::config::AppConfig;
use crate::messages::{Msg, ViewportMsg};
use crate::model::{AppModel, RowStore};
use crate::persistence::RowPersistence;
use crate::update::update;
use crate::view::{Frame, TextRenderer};

/// Upper bound on render → measure → re-layout rounds per frame
pub const MAX_MEASURE_PASSES: usize = 8;

pub struct Session {
    model: AppModel,
    persistence: Box<dyn RowPersistence>,
    renderer: TextRenderer,
    persist_failures: usize,
}

impl Session {
    /// Start a session seeded from persistence
    pub fn open(config: &AppConfig, persistence: Box<dyn RowPersistence>) -> Self {
        let store = RowStore::from_rows(persistence.load());
        tracing::debug!(rows = store.len(), "session opened");
        Self {
            model: AppModel::new(store, config),
            persistence,
            renderer: config.renderer(),
            persist_failures: 0,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn renderer(&self) -> TextRenderer {
        self.renderer
    }

    /// Change column widths; every row is measured again
    pub fn set_renderer(&mut self, renderer: TextRenderer) {
        if self.renderer == renderer {
            return;
        }
        self.renderer = renderer;
        self.model.virtualizer.clear_measurements();
        self.model.viewport.clamp(&self.model.virtualizer);
    }

    /// Number of writes that failed since the session opened
    pub fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    /// Apply a message and run its side effects
    ///
    /// Returns `true` when the table needs to be drawn again.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        match update(&mut self.model, msg) {
            Some(cmd) => self.execute(cmd),
            None => false,
        }
    }

    fn execute(&mut self, cmd: Cmd) -> bool {
        match cmd {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::PersistRows => {
                self.persist();
                false
            }
            Cmd::Batch(cmds) => cmds
                .into_iter()
                .fold(false, |redraw, cmd| self.execute(cmd) || redraw),
        }
    }

    /// Write the full table; failures are logged and editing carries on
    fn persist(&mut self) {
        if let Err(e) = self.persistence.store(self.model.store.rows()) {
            self.persist_failures += 1;
            tracing::warn!("Table not saved, changes are kept in memory only: {}", e);
        }
    }

    /// Lay out and render the visible window
    ///
    /// Unmeasured rows in the window are measured and reported back. When a
    /// measurement moves the layout, the window is computed again, so rows
    /// pulled into view by the correction are measured too.
    pub fn render_frame(&mut self) -> Frame {
        for pass in 0..MAX_MEASURE_PASSES {
            if !self.measure_window() {
                break;
            }
            if pass + 1 == MAX_MEASURE_PASSES {
                tracing::debug!("layout still moving after {} passes", MAX_MEASURE_PASSES);
            }
        }

        let model = &self.model;
        let items = model
            .virtualizer
            .visible_window(model.viewport.scroll_offset, model.viewport.height);

        let rows = items
            .iter()
            .filter_map(|item| {
                let row = model.store.get(item.id)?;
                let active = model
                    .active_cell
                    .filter(|cell| cell.id == item.id)
                    .map(|cell| cell.column);
                Some(self.renderer.render_row(item, row, active))
            })
            .collect();

        Frame {
            rows,
            scroll_offset: model.viewport.scroll_offset,
            viewport_height: model.viewport.height,
            total_extent: model.virtualizer.total_extent(),
            display_len: model.display_order.len(),
            row_count: model.store.len(),
            key_width: self.renderer.key_width,
            value_width: self.renderer.value_width,
        }
    }

    /// Measure unmeasured rows in the current window; `true` if layout moved
    ///
    /// Each row is laid out with the size the virtualizer hands out, then
    /// rendered and its real size reported back.
    fn measure_window(&mut self) -> bool {
        let viewport = self.model.viewport;
        let range = self
            .model
            .virtualizer
            .window_range(viewport.scroll_offset, viewport.height);

        let mut moved = false;
        for position in range {
            let virtualizer = &self.model.virtualizer;
            if virtualizer.is_measured(position) {
                continue;
            }
            let (Some(id), Some(laid_out)) =
                (virtualizer.key_at(position), virtualizer.request_render(position))
            else {
                continue;
            };
            let Some(row) = self.model.store.get(id) else {
                continue;
            };
            let size = self.renderer.measure(row);
            if size != laid_out {
                tracing::trace!(position, laid_out, size, "row size corrected");
            }
            let msg = Msg::Viewport(ViewportMsg::Measured { position, size });
            moved |= update(&mut self.model, msg).is_some();
        }
        moved
    }
}
