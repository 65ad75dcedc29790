//! Configuration loading.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "mathplan.toml";

/// Load the configuration at `path`.
///
/// A missing file yields the defaults; a present but malformed or invalid file
/// is an error.
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    parse_config_content(&content)
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
