//! Table viewport
//!
//! Tracks the scroll offset and height of the table area, in layout units.

use crate::virtualizer::Virtualizer;

/// Default viewport height in text lines
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableViewport {
    /// Offset of the viewport's top edge
    pub scroll_offset: u64,
    /// Viewport height
    pub height: u32,
}

impl Default for TableViewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl TableViewport {
    pub fn new(height: u32) -> Self {
        Self {
            scroll_offset: 0,
            height,
        }
    }

    /// Keep the offset within `[0, extent - height]`
    pub fn clamp(&mut self, layout: &Virtualizer) {
        self.scroll_offset = self.scroll_offset.min(layout.max_scroll_offset(self.height));
    }

    pub fn scroll_to(&mut self, offset: u64, layout: &Virtualizer) {
        self.scroll_offset = offset;
        self.clamp(layout);
    }

    pub fn scroll_by(&mut self, delta: i64, layout: &Virtualizer) {
        let offset = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta as u64)
        };
        self.scroll_to(offset, layout);
    }

    pub fn resize(&mut self, height: u32, layout: &Virtualizer) {
        self.height = height;
        self.clamp(layout);
    }

    /// Scroll the minimum amount needed to show a display position
    pub fn ensure_visible(&mut self, position: usize, layout: &Virtualizer) {
        self.scroll_offset = layout.scroll_offset_to_reveal(position, self.scroll_offset, self.height);
        self.clamp(layout);
    }
}
