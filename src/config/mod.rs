//! TOML configuration and default paths.
//!
//! A missing file at the default location is not an error: every field has
//! a default. A path given explicitly must exist.

pub mod schema;

pub use schema::{AuthConfig, Config, StorageBackend, StorageConfig};

use crate::auth::AuthService;
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const APP_NAME: &str = "capivara";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// `<config dir>/capivara/config.toml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// `<data dir>/capivara/auth.db`, falling back to the working directory.
pub fn default_db_path() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("auth.db"))
        .unwrap_or_else(|| PathBuf::from("auth.db"))
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::load_default(default_config_path().as_deref()),
        }
    }

    /// Load `default_path` if it exists, otherwise fall back to defaults.
    fn load_default(default_path: Option<&Path>) -> Result<Self> {
        match default_path {
            Some(path) if path.exists() => Self::load_file(path),
            Some(path) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.auth.latency_ms)
    }

    /// JSON Schema of the config file, pretty-printed.
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(Config);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Open the configured key-value backend.
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        match self.storage.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StorageBackend::Sqlite => {
                let path = self.storage.path.clone().unwrap_or_else(default_db_path);
                tracing::debug!("Opening sqlite store at {}", path.display());
                Ok(Arc::new(SqliteStore::open(&path)?))
            }
        }
    }

    /// Store plus service, ready for the signup/login flow.
    pub fn build_service(&self) -> Result<AuthService> {
        Ok(AuthService::new(self.open_store()?).with_latency(self.latency()))
    }
}
