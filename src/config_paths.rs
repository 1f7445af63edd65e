//! Centralized paths for template-search
//!
//! All config and data files live under:
//! - Unix/macOS: `~/.config/template-search/`
//! - Windows: `%APPDATA%\template-search\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "template-search";

/// File name of the persisted table
pub const TABLE_STORE_FILE: &str = "docs-table-data.json";

/// Prefix of the daily rolling log files
pub const LOG_FILE_PREFIX: &str = "template-search.log";

/// Base config directory for template-search
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/template-search`
///   - Else: `~/.config/template-search`
///
/// Windows:
///   - `%APPDATA%\template-search`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/template-search/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/template-search/docs-table-data.json`
pub fn table_store_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(TABLE_STORE_FILE))
}

/// `~/.config/template-search/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
