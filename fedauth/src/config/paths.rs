//! Platform-specific path utilities for fedauth.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Get the configuration directory for fedauth.
///
/// - Linux: `~/.config/fedauth`
/// - macOS: `~/Library/Application Support/fedauth`
/// - Windows: `%APPDATA%\fedauth`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir()
        .ok_or_else(|| ConfigError::Invalid("Cannot determine config directory".to_string()))?;
    Ok(base.join("fedauth"))
}

/// Get the main configuration file path.
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}
