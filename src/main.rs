#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Action, CliArgs, StartupConfig, StoreChoice};
use template_search::config::AppConfig;
use template_search::config_paths;
use template_search::export::export_path;
use template_search::import::import_path;
use template_search::messages::{DataMsg, Msg, SearchMsg, TableMsg, ViewportMsg};
use template_search::persistence::{JsonFileStore, MemoryStore, RowPersistence};
use template_search::view::truncate_text;
use template_search::Session;

/// Width of each cell in `search` output
const SEARCH_CELL_WIDTH: usize = 40;

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    template_search::tracing::init();

    let config = match &startup.config_path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let persistence = open_persistence(&startup, &config)?;
    let mut session = Session::open(&config, persistence);
    run(&mut session, startup.action)?;

    if session.persist_failures() > 0 {
        eprintln!("Warning: changes could not be saved (see log for details)");
    }

    Ok(())
}

fn open_persistence(startup: &StartupConfig, config: &AppConfig) -> Result<Box<dyn RowPersistence>> {
    let quota = config.storage_quota_bytes;
    Ok(match &startup.store {
        StoreChoice::Disabled => Box::new(MemoryStore::new()),
        StoreChoice::Path(path) => Box::new(JsonFileStore::new(path.clone(), quota)),
        StoreChoice::Default => {
            let path = config_paths::table_store_path()
                .context("No config directory available for the table store")?;
            Box::new(JsonFileStore::new(path, quota))
        }
    })
}

fn run(session: &mut Session, action: Action) -> Result<()> {
    match action {
        Action::Import(file) => {
            let rows = import_path(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let count = rows.len();
            session.dispatch(Msg::Data(DataMsg::ReplaceRows(rows)));
            println!("Imported {} rows from {}", count, file.display());
        }
        Action::Export(file) => {
            let rows = session.model().store.rows();
            export_path(&file, rows)
                .with_context(|| format!("Failed to export {}", file.display()))?;
            println!("Exported {} rows to {}", rows.len(), file.display());
        }
        Action::Search { query, limit } => {
            session.dispatch(Msg::Search(SearchMsg::SetQuery(query)));
            let model = session.model();
            for (position, entry) in model.scored.iter().take(limit).enumerate() {
                let Some(row) = model.store.get(entry.id) else {
                    continue;
                };
                println!(
                    "{:>4}  {:>5}  {:<w$}  {}",
                    position + 1,
                    entry.score,
                    truncate_text(row.key_text(), SEARCH_CELL_WIDTH),
                    truncate_text(row.value_text(), SEARCH_CELL_WIDTH),
                    w = SEARCH_CELL_WIDTH
                );
            }
            println!(
                "{} of {} rows match",
                model.display_order.len(),
                model.store.len()
            );
        }
        Action::View {
            query,
            scroll,
            height,
        } => {
            if let Some(query) = query {
                session.dispatch(Msg::Search(SearchMsg::SetQuery(query)));
            }
            if let Some(height) = height {
                session.dispatch(Msg::Viewport(ViewportMsg::Resize(height)));
            }
            // measure the top of the table so the offset clamps against real sizes
            session.render_frame();
            session.dispatch(Msg::Viewport(ViewportMsg::ScrollTo(scroll)));
            print!("{}", session.render_frame());
        }
        Action::Edit {
            position,
            column,
            query,
            content,
        } => {
            if let Some(query) = query {
                session.dispatch(Msg::Search(SearchMsg::SetQuery(query)));
            }
            let shown = session.model().display_order.len();
            if position >= shown {
                bail!(
                    "Position {} is out of range ({} rows shown)",
                    position + 1,
                    shown
                );
            }
            let id = session.model().display_order.get(position);
            session.dispatch(Msg::Table(TableMsg::EditCell {
                position,
                column,
                content,
            }));
            if let Some(row) = id.and_then(|id| session.model().store.get(id)) {
                println!("{}  {}  {}", row.id(), row.key_text(), row.value_text());
            }
        }
    }
    Ok(())
}
