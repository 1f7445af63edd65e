//! Tracing setup and state snapshots for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=message=debug,view=debug` - scoped filtering
//! - `RUST_LOG=template_search::virtualizer=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/template-search/logs/template-search.log`
//! with daily rotation, at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::model::AppModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output goes to stderr and respects RUST_LOG (default `warn`).
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the derived view for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub revision: u64,
    pub row_count: usize,
    pub query: String,
    pub display_len: usize,
    pub total_extent: u64,
    pub scroll_offset: u64,
    pub active_cell: Option<String>,
}

impl ViewSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        Self {
            revision: model.store.revision(),
            row_count: model.store.len(),
            query: model.query.clone(),
            display_len: model.display_order.len(),
            total_extent: model.virtualizer.total_extent(),
            scroll_offset: model.viewport.scroll_offset,
            active_cell: model
                .active_cell
                .map(|cell| format!("{}.{}", cell.id, cell.column.label())),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &ViewSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.revision != other.revision {
            changes.push(format!("revision: {} → {}", self.revision, other.revision));
        }
        if self.row_count != other.row_count {
            changes.push(format!("rows: {} → {}", self.row_count, other.row_count));
        }
        if self.query != other.query {
            changes.push(format!("query: {:?} → {:?}", self.query, other.query));
        }
        if self.display_len != other.display_len {
            changes.push(format!(
                "shown: {} → {}",
                self.display_len, other.display_len
            ));
        }
        if self.total_extent != other.total_extent {
            changes.push(format!(
                "extent: {} → {}",
                self.total_extent, other.total_extent
            ));
        }
        if self.scroll_offset != other.scroll_offset {
            changes.push(format!(
                "scroll: {} → {}",
                self.scroll_offset, other.scroll_offset
            ));
        }
        if self.active_cell != other.active_cell {
            changes.push(format!(
                "active: {} → {}",
                self.active_cell.as_deref().unwrap_or("none"),
                other.active_cell.as_deref().unwrap_or("none")
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
