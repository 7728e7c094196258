//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::security::PolicyError;

/// Environment variable consulted when no auth token is configured.
pub const AUTH_TOKEN_ENV: &str = "TWILIO_AUTH_TOKEN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid policy: {0}")]
    Policy(#[from] PolicyError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, sanitize, apply environment fallbacks and validate TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = toml::from_str(content)?;
    config.sanitize();
    apply_env_fallback(&mut config, std::env::var(AUTH_TOKEN_ENV).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Fill the account auth token from the environment when the file has none.
pub fn apply_env_fallback(config: &mut AppConfig, env_token: Option<String>) {
    if config.twilio.auth_token.is_none() {
        config.twilio.auth_token = env_token.filter(|t| !t.is_empty());
    }
}
