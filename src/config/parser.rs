use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use super::models::DashboardConfig;
use crate::constants::network::API_URL_ENV_VAR;

/// Errors that can occur during configuration parsing
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Other(String),
}

/// Provides default configuration file path
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".momo-dash").join("config.yaml"))
        .ok_or_else(|| ConfigError::Other("Could not determine home directory".to_string()))
}

/// Loads and validates the dashboard configuration
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<DashboardConfig, ConfigError> {
    let mut file = File::open(&config_path).map_err(ConfigError::FileError)?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(ConfigError::FileError)?;

    parse_config(&content)
}

/// Parses and validates configuration from YAML text
pub fn parse_config(content: &str) -> Result<DashboardConfig, ConfigError> {
    // An empty file means "all defaults"
    let config: DashboardConfig = if content.trim().is_empty() {
        DashboardConfig::default()
    } else {
        serde_yaml::from_str(content).map_err(ConfigError::ParseError)?
    };

    config.validate().map_err(ConfigError::ValidationError)?;

    Ok(config)
}

/// Resolves the configuration to run with.
///
/// An explicit path must exist. The default path may be missing, in which
/// case built-in defaults are used. The API URL environment variable always
/// wins over the file.
pub fn resolve_config(explicit_path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let mut config = match explicit_path {
        Some(path) => {
            info!("Using configuration file: {:?}", path);
            load_config(path)?
        }
        None => {
            let path = default_config_path()?;
            if path.exists() {
                info!("Using configuration file: {:?}", path);
                load_config(&path)?
            } else {
                warn!("No configuration file at {:?}, using defaults", path);
                DashboardConfig::default()
            }
        }
    };

    if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
        apply_api_url_override(&mut config, &url)?;
    }

    Ok(config)
}

/// Replaces the API base URL and re-validates the result
pub fn apply_api_url_override(config: &mut DashboardConfig, url: &str) -> Result<(), ConfigError> {
    info!("Overriding API base URL from {}", API_URL_ENV_VAR);
    config.api.base_url = url.to_string();
    config.validate().map_err(ConfigError::ValidationError)
}
