//! Command-line argument parsing
//!
//! Supports:
//! - Importing a .docx/.csv/.tsv/.json table (replaces the stored table)
//! - Exporting the stored table as .docx or .csv
//! - Ranked search and a rendered, scrolled view of the results
//! - Editing one cell by its position in the (optionally filtered) view

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use template_search::model::Column;
use template_search::richtext;

/// Rows shown by `search` when --limit is not given
const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Search and edit a two-column document table
#[derive(Parser, Debug)]
#[command(
    name = "template-search",
    version,
    about = "Search and edit a two-column document table"
)]
pub struct CliArgs {
    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Table store to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// Keep the table in memory only (nothing is read or written)
    #[arg(long, global = true)]
    pub no_persist: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replace the table with rows read from a document
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write the table to a .docx or .csv file
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print ranked matches for a query
    Search {
        query: String,

        /// Show at most N rows
        #[arg(long, value_name = "N", default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Render the visible window of the table
    View {
        /// Filter and rank rows first
        #[arg(long)]
        query: Option<String>,

        /// Scroll offset in lines
        #[arg(long, value_name = "N", default_value_t = 0)]
        scroll: u64,

        /// Viewport height in lines (defaults to the configured height)
        #[arg(long, value_name = "N")]
        height: Option<u32>,
    },
    /// Replace one cell, addressed by its 1-based position in the view
    Edit {
        #[arg(long, value_name = "N")]
        position: usize,

        /// key or value
        #[arg(long)]
        column: Column,

        /// Query the position refers to
        #[arg(long)]
        query: Option<String>,

        /// Treat CONTENT as plain text rather than markup
        #[arg(long)]
        plain: bool,

        content: String,
    },
}

/// Where rows are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChoice {
    /// `docs-table-data.json` under the config directory
    Default,
    Path(PathBuf),
    Disabled,
}

/// What to run, with user input already normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Import(PathBuf),
    Export(PathBuf),
    Search {
        query: String,
        limit: usize,
    },
    View {
        query: Option<String>,
        scroll: u64,
        height: Option<u32>,
    },
    Edit {
        /// 0-based display position
        position: usize,
        column: Column,
        query: Option<String>,
        /// Cell markup
        content: String,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub config_path: Option<PathBuf>,
    pub store: StoreChoice,
    pub action: Action,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let store = match (self.store, self.no_persist) {
            (Some(_), true) => {
                return Err("--store and --no-persist cannot be used together".to_string())
            }
            (Some(path), false) => StoreChoice::Path(path),
            (None, true) => StoreChoice::Disabled,
            (None, false) => StoreChoice::Default,
        };

        let action = match self.command {
            Command::Import { file } => Action::Import(file),
            Command::Export { file } => Action::Export(file),
            Command::Search { query, limit } => Action::Search { query, limit },
            Command::View {
                query,
                scroll,
                height,
            } => {
                if height == Some(0) {
                    return Err("--height must be at least 1".to_string());
                }
                Action::View {
                    query,
                    scroll,
                    height,
                }
            }
            Command::Edit {
                position,
                column,
                query,
                plain,
                content,
            } => {
                // 1-indexed from the user, 0-indexed internally
                if position == 0 {
                    return Err("--position starts at 1".to_string());
                }
                let content = if plain {
                    richtext::from_plain_text(&content)
                } else {
                    content
                };
                Action::Edit {
                    position: position - 1,
                    column,
                    query,
                    content,
                }
            }
        };

        Ok(StartupConfig {
            config_path: self.config,
            store,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: Command) -> CliArgs {
        CliArgs {
            config: None,
            store: None,
            no_persist: false,
            command,
        }
    }

    #[test]
    fn test_default_store() {
        let config = args(Command::Export {
            file: PathBuf::from("out.docx"),
        })
        .into_config()
        .unwrap();
        assert_eq!(config.store, StoreChoice::Default);
        assert_eq!(config.action, Action::Export(PathBuf::from("out.docx")));
    }

    #[test]
    fn test_store_and_no_persist_conflict() {
        let mut cli = args(Command::Search {
            query: "apple".to_string(),
            limit: 5,
        });
        cli.store = Some(PathBuf::from("rows.json"));
        cli.no_persist = true;
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_no_persist() {
        let mut cli = args(Command::Import {
            file: PathBuf::from("in.csv"),
        });
        cli.no_persist = true;
        assert_eq!(cli.into_config().unwrap().store, StoreChoice::Disabled);
    }

    #[test]
    fn test_edit_position_conversion() {
        let config = args(Command::Edit {
            position: 3,
            column: Column::Value,
            query: Some("banana".to_string()),
            plain: false,
            content: "<em>x</em>".to_string(),
        })
        .into_config()
        .unwrap();
        // 1-indexed to 0-indexed: position 3 → 2
        assert_eq!(
            config.action,
            Action::Edit {
                position: 2,
                column: Column::Value,
                query: Some("banana".to_string()),
                content: "<em>x</em>".to_string(),
            }
        );
    }

    #[test]
    fn test_edit_position_zero_rejected() {
        let cli = args(Command::Edit {
            position: 0,
            column: Column::Key,
            query: None,
            plain: false,
            content: String::new(),
        });
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_edit_plain_content_is_escaped() {
        let config = args(Command::Edit {
            position: 1,
            column: Column::Key,
            query: None,
            plain: true,
            content: "a < b\nc".to_string(),
        })
        .into_config()
        .unwrap();
        match config.action {
            Action::Edit { content, .. } => assert_eq!(content, "a &lt; b<br>c"),
            other => panic!("Expected Edit, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_height_rejected() {
        let cli = args(Command::View {
            query: None,
            scroll: 0,
            height: Some(0),
        });
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_parses_from_argv() {
        let cli = CliArgs::try_parse_from([
            "template-search",
            "edit",
            "--position",
            "2",
            "--column",
            "key",
            "--no-persist",
            "pear",
        ])
        .unwrap();
        assert!(cli.no_persist);
        let config = cli.into_config().unwrap();
        assert!(matches!(
            config.action,
            Action::Edit {
                position: 1,
                column: Column::Key,
                ..
            }
        ));
    }
}
