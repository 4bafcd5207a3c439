//! Configuration loading
//!
//! Embedded defaults, then `config/local.toml`, then `VAAKKU_*` variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use vaakku_client::ClientConfig;
use vaakku_core::{FileStore, SharedStore};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Shortcut variable for `api.base_url`
const API_URL_ENV: &str = "VAAKKU_API_URL";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// API connection
    #[serde(default)]
    pub api: ClientConfig,
    /// Profile storage
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the profile store lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Profile directory; `~/.vaakku` when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// File name inside the profile directory
    #[serde(default = "default_storage_file")]
    pub file: String,
}

fn default_storage_file() -> String {
    vaakku_core::storage::DEFAULT_FILE_NAME.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file: default_storage_file(),
        }
    }
}

impl StorageConfig {
    /// Full path of the profile file
    pub fn path(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(vaakku_core::default_profile_dir)
            .join(&self.file)
    }
}

impl AppConfig {
    /// Open the profile store
    pub fn store(&self) -> SharedStore {
        Arc::new(FileStore::new(self.storage.path()))
    }
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/local").required(false))
        // prefix_separator("_") so VAAKKU_API__BASE_URL maps to api.base_url
        .add_source(
            Environment::with_prefix("VAAKKU")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut app: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    if let Some(url) = std::env::var(API_URL_ENV)
        .ok()
        .filter(|u| !u.trim().is_empty())
    {
        app.api.base_url = url;
    }

    Ok(app)
}
