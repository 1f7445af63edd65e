//! Application configuration
//!
//! Reads user preferences from `~/.config/template-search/config.yaml`

use std::path::Path;

use serde::Deserialize;

use crate::view::{TextRenderer, DEFAULT_KEY_WIDTH, DEFAULT_VALUE_WIDTH, DEFAULT_VIEWPORT_HEIGHT};
use crate::virtualizer::{VirtualizerOptions, DEFAULT_ESTIMATED_SIZE, DEFAULT_OVERSCAN};

/// Browser local storage allows about 5 MiB per origin
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Height assumed for rows that have not been rendered yet, in lines
    #[serde(default = "default_estimated_row_size")]
    pub estimated_row_size: u32,
    /// Rows rendered beyond each edge of the viewport
    #[serde(default = "default_overscan")]
    pub overscan: usize,
    /// Table viewport height, in lines
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Key column width, in display columns
    #[serde(default = "default_key_width")]
    pub key_width: usize,
    /// Value column width, in display columns
    #[serde(default = "default_value_width")]
    pub value_width: usize,
    /// Largest table the row store will write; `null` disables the check
    #[serde(default = "default_storage_quota_bytes")]
    pub storage_quota_bytes: Option<u64>,
}

fn default_estimated_row_size() -> u32 {
    DEFAULT_ESTIMATED_SIZE
}

fn default_overscan() -> usize {
    DEFAULT_OVERSCAN
}

fn default_viewport_height() -> u32 {
    DEFAULT_VIEWPORT_HEIGHT
}

fn default_key_width() -> usize {
    DEFAULT_KEY_WIDTH
}

fn default_value_width() -> usize {
    DEFAULT_VALUE_WIDTH
}

fn default_storage_quota_bytes() -> Option<u64> {
    Some(DEFAULT_STORAGE_QUOTA_BYTES)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            estimated_row_size: default_estimated_row_size(),
            overscan: default_overscan(),
            viewport_height: default_viewport_height(),
            key_width: default_key_width(),
            value_width: default_value_width(),
            storage_quota_bytes: default_storage_quota_bytes(),
        }
    }
}

impl AppConfig {
    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults if missing or malformed
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn virtualizer_options(&self) -> VirtualizerOptions {
        VirtualizerOptions {
            estimate_size: self.estimated_row_size.max(1),
            overscan: self.overscan,
        }
    }

    pub fn renderer(&self) -> TextRenderer {
        TextRenderer::new(self.key_width, self.value_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("overscan: 2\n").unwrap();
        assert_eq!(config.overscan, 2);
        assert_eq!(config.estimated_row_size, DEFAULT_ESTIMATED_SIZE);
        assert_eq!(config.storage_quota_bytes, Some(DEFAULT_STORAGE_QUOTA_BYTES));
    }

    #[test]
    fn test_null_quota_disables_limit() {
        let config: AppConfig = serde_yaml::from_str("storage_quota_bytes: null\n").unwrap();
        assert_eq!(config.storage_quota_bytes, None);
    }

    #[test]
    fn test_load_from_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());

        std::fs::write(&path, "key_width: 12\nvalue_width: 30\n").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.key_width, 12);
        assert_eq!(config.value_width, 30);
        assert_eq!(config.overscan, DEFAULT_OVERSCAN);

        std::fs::write(&path, "key_width: [not, a, number]\n").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_zero_estimate_is_raised() {
        let config = AppConfig {
            estimated_row_size: 0,
            ..Default::default()
        };
        assert_eq!(config.virtualizer_options().estimate_size, 1);
    }
}
