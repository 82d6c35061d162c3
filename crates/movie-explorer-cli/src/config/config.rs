//! `AppConfig` struct and TOML loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// `[tmdb]` section.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbConfig {
    /// Bearer token. `TMDB_API_TOKEN` takes precedence.
    #[serde(default)]
    pub api_token: Option<String>,
    /// API base URL (default: `https://api.themoviedb.org/3/`).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Response language (default: `en-US`).
    #[serde(default)]
    pub language: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl TmdbConfig {
    /// Picks the API token: a non-blank `env_token` wins over the config file.
    #[must_use]
    pub fn resolve_api_token(&self, env_token: Option<String>) -> Option<String> {
        env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.api_token
                    .clone()
                    .filter(|t| !t.trim().is_empty())
            })
    }
}
