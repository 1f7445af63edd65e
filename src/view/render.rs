//! Terminal table rendering
//!
//! Lays each row out as a row number column plus the key and value columns,
//! word-wrapped to fixed display widths. A row's rendered height in lines is
//! the measurement fed back to the virtualizer.

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{Column, Row, StableIndex};
use crate::virtualizer::VirtualItem;

pub const DEFAULT_KEY_WIDTH: usize = 28;
pub const DEFAULT_VALUE_WIDTH: usize = 64;

/// Greedy word wrap by display width
///
/// Words wider than `width` are broken across lines. Always returns at least
/// one (possibly empty) line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for source_line in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in source_line.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            let sep = usize::from(!line.is_empty());

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
                if line_width + cw > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += cw;
            }
        }

        lines.push(line);
    }

    lines
}

/// Truncate text with ellipsis if wider than `max_width`
pub fn truncate_text(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut result = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        result.push(ch);
    }
    result.push('…');
    result
}

fn pad_right(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(sw)))
}

fn digits(n: usize) -> usize {
    n.max(1).to_string().len()
}

/// One laid-out row of the visible window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub position: usize,
    pub id: StableIndex,
    pub offset: u64,
    pub key_lines: Vec<String>,
    pub value_lines: Vec<String>,
    /// Column holding the focused cell, if it is in this row
    pub active: Option<Column>,
}

impl RenderedRow {
    /// Rendered height in lines
    pub fn height(&self) -> u32 {
        self.key_lines.len().max(self.value_lines.len()).max(1) as u32
    }

    /// Row number shown to the user (1-based display position)
    pub fn number(&self) -> usize {
        self.position + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    pub key_width: usize,
    pub value_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_WIDTH, DEFAULT_VALUE_WIDTH)
    }
}

impl TextRenderer {
    pub fn new(key_width: usize, value_width: usize) -> Self {
        Self {
            key_width: key_width.max(1),
            value_width: value_width.max(1),
        }
    }

    /// Height a row occupies when rendered
    pub fn measure(&self, row: &Row) -> u32 {
        let key = wrap_text(row.key_text(), self.key_width).len();
        let value = wrap_text(row.value_text(), self.value_width).len();
        key.max(value).max(1) as u32
    }

    pub fn render_row(&self, item: &VirtualItem, row: &Row, active: Option<Column>) -> RenderedRow {
        RenderedRow {
            position: item.position,
            id: item.id,
            offset: item.offset,
            key_lines: wrap_text(row.key_text(), self.key_width),
            value_lines: wrap_text(row.value_text(), self.value_width),
            active,
        }
    }
}

/// A rendered view of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Rows of the visible window, overscan included
    pub rows: Vec<RenderedRow>,
    pub scroll_offset: u64,
    pub viewport_height: u32,
    pub total_extent: u64,
    /// Rows in the display order
    pub display_len: usize,
    /// Rows in the store
    pub row_count: usize,
    pub key_width: usize,
    pub value_width: usize,
}

impl Frame {
    /// Rows that intersect the viewport (overscan excluded)
    pub fn visible_rows(&self) -> impl Iterator<Item = &RenderedRow> {
        let top = self.scroll_offset;
        let bottom = top + u64::from(self.viewport_height);
        self.rows.iter().filter(move |row| {
            let end = row.offset + u64::from(row.height());
            row.offset < bottom && end > top
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number_width = digits(self.display_len);

        writeln!(
            f,
            "{} of {} rows, offset {}/{}",
            self.display_len, self.row_count, self.scroll_offset, self.total_extent
        )?;

        for row in self.visible_rows() {
            let height = row.height() as usize;
            let marker = |column: Column| if row.active == Some(column) { '*' } else { ' ' };

            for line in 0..height {
                let number = if line == 0 {
                    row.number().to_string()
                } else {
                    String::new()
                };
                let key = row.key_lines.get(line).map(String::as_str).unwrap_or("");
                let value = row.value_lines.get(line).map(String::as_str).unwrap_or("");
                writeln!(
                    f,
                    "{:>nw$} │{}{} │{}{}",
                    number,
                    marker(Column::Key),
                    pad_right(key, self.key_width),
                    marker(Column::Value),
                    value.trim_end(),
                    nw = number_width,
                )?;
            }
        }
        Ok(())
    }
}
