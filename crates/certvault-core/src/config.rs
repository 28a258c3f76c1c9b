//! Application configuration management.
//!
//! Holds the API base URL, the storage bucket used to build download links,
//! and the last username entered at login.
//!
//! Configuration is stored at `~/.config/certvault/config.json`. The
//! `CERTVAULT_API_URL`, `CERTVAULT_S3_BUCKET` and `CERTVAULT_S3_REGION`
//! environment variables override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::StorageLocation;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "certvault";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_STORAGE_REGION: &str = "eu-north-1";

pub const ENV_API_URL: &str = "CERTVAULT_API_URL";
pub const ENV_S3_BUCKET: &str = "CERTVAULT_S3_BUCKET";
pub const ENV_S3_REGION: &str = "CERTVAULT_S3_REGION";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Every endpoint is resolved against this one authority
    pub api_base_url: String,
    pub storage: StorageLocation,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage: StorageLocation::new("", DEFAULT_STORAGE_REGION),
            last_username: None,
        }
    }
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Record the last signed-in username in the file at `path`.
    ///
    /// The file is re-read first so environment overrides applied to the
    /// in-memory config are never written back.
    pub fn remember_username(path: &Path, username: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.last_username = Some(username.to_string());
        stored.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in `load`).
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(bucket) = get(ENV_S3_BUCKET) {
            self.storage.bucket = bucket;
        }
        if let Some(region) = get(ENV_S3_REGION) {
            self.storage.region = region;
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session and the log file
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
