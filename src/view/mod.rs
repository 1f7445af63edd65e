//! Table view: position mapping, viewport and terminal rendering

pub mod index_map;
mod render;
mod viewport;

pub use render::{
    truncate_text, wrap_text, Frame, RenderedRow, TextRenderer, DEFAULT_KEY_WIDTH,
    DEFAULT_VALUE_WIDTH,
};
pub use viewport::{TableViewport, DEFAULT_VIEWPORT_HEIGHT};
