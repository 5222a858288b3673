//! Configuration types for the metasearch service.
//!
//! Loaded once at startup from TOML and shared read-only afterwards. Every
//! section uses `#[serde(default)]`, so a partial file only overrides what
//! it names.

use std::path::{Path, PathBuf};

use metasearch_core::{EngineRegistry, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Engines, deadlines and score weights.
    pub search: SearchConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `0` picks a free port.
    pub port: u16,
    /// Directory served for every path that is not an API route.
    /// `None` disables static files.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8080,
            static_dir: Some(PathBuf::from("html")),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the TOML is malformed or mistyped.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load `path` if given, else the default path if it exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be loaded, or the
    /// default file exists but is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            tracing::info!(path = %default_path.display(), "loading config");
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path: `~/.config/metasearch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("metasearch").join("config.toml")
        } else if let Some(config) = dirs::config_dir() {
            config.join("metasearch").join("config.toml")
        } else {
            PathBuf::from("/tmp/metasearch-config/config.toml")
        }
    }

    /// Check the configuration against the engines actually available.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the search section is invalid or a
    /// default engine is not registered.
    pub fn validate(&self, registry: &EngineRegistry) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if let Some(missing) = self.search.engines.iter().find(|e| !registry.contains(e)) {
            return Err(AppError::Config(format!(
                "default engine {missing} is not a supported engine (available: {})",
                registry.names().join(", ")
            )));
        }
        Ok(())
    }
}
