//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RaceConfig;
use crate::config::validation::{validate_config, ValidationErrors};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RaceConfig, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Read and deserialize a TOML file without semantic checks.
///
/// For callers that adjust the config (CLI overrides) and validate after.
pub fn read_config(path: &Path) -> Result<RaceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RaceConfig, ConfigError> {
    let config: RaceConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Run semantic checks, wrapping failures as [`ConfigError::Validation`].
pub fn validate(config: &RaceConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(|errors| ConfigError::Validation(ValidationErrors(errors)))
}
