//! Config and log file resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application directory name under `~/.config` and `~/.local/state`.
const APP_DIR: &str = "movie-explorer";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/movie-explorer/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    Ok(home()?.join(".config").join(APP_DIR).join("config.toml"))
}

/// Resolves the log file used while the TUI owns the terminal.
///
/// - If `dir` is `Some`, returns `{dir}/browse.log`.
/// - Otherwise returns `~/.local/state/movie-explorer/browse.log`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_log_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("browse.log"));
    }

    Ok(home()?
        .join(".local")
        .join("state")
        .join(APP_DIR)
        .join("browse.log"))
}

fn home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home))
}
