//! Configuration management for fedauth.

pub mod paths;
pub mod settings;

pub use paths::config_file;
pub use settings::{BackendConfig, FedAuthConfig, GoogleConfig, NonceConfig};

use std::path::Path;

use crate::error::ConfigError;

/// Load configuration from the default config file.
///
/// If the config file doesn't exist, returns default configuration.
pub fn load_config() -> Result<FedAuthConfig, ConfigError> {
    let path = config_file()?;
    load_config_from(&path)
}

/// Load configuration from a specific path.
///
/// If the file doesn't exist, returns default configuration.
pub fn load_config_from(path: &Path) -> Result<FedAuthConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(FedAuthConfig::default().with_env_overrides());
    }

    let contents = std::fs::read_to_string(path)?;
    let config: FedAuthConfig = toml::from_str(&contents)?;

    Ok(config.with_env_overrides())
}

/// Save configuration to a specific path.
pub fn save_config_to(config: &FedAuthConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;

    Ok(())
}
