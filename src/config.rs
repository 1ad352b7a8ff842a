use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::location::DEFAULT_PAGE_ADDRESS;

/// Environment variable overriding the page address.
pub const ADDRESS_ENV: &str = "QUERY_BUILDER_ADDRESS";

/// Startup settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial page address; its `url` parameter is loaded as the base
    pub page_address: String,
    /// Base value used when the page address carries no `url` parameter
    pub initial_base: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_address: DEFAULT_PAGE_ADDRESS.to_string(),
            initial_base: None,
        }
    }
}

impl Config {
    /// Load from the config file, then apply the environment and the first
    /// command-line argument.
    pub fn load() -> Self {
        let from_file = match Self::get_config_path() {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                None
            }),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };

        from_file
            .unwrap_or_default()
            .with_overrides(std::env::var(ADDRESS_ENV).ok(), std::env::args().nth(1))
    }

    /// Get the config file path
    fn get_config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find config directory"))?;
        Ok(dir.join("query-builder").join("config.json"))
    }

    /// Read a config file. A missing file is `Ok(None)`.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(Self::from_json(&content)?))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Later sources win: `arg` over `env` over what is already set.
    pub fn with_overrides(mut self, env: Option<String>, arg: Option<String>) -> Self {
        let given = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        if let Some(address) = given(arg).or_else(|| given(env)) {
            self.page_address = address;
        }
        self
    }
}
