//! Template Search - ranked search over a two-column document table
//!
//! This crate provides the core types and logic for filtering, ranking,
//! editing and virtually rendering large key/value tables, implementing the
//! Elm Architecture pattern.

pub mod commands;
pub mod config;
pub mod config_paths;
pub mod export;
pub mod import;
pub mod messages;
pub mod model;
pub mod persistence;
pub mod richtext;
pub mod runtime;
pub mod search;
pub mod tracing;
pub mod update;
pub mod view;
pub mod virtualizer;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::AppConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use runtime::Session;
