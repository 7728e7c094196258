//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require an auth token for request validation
//! - Validate value ranges and address/URL formats
//! - Resolve a validated config into a `ValidationPolicy`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::schema::AppConfig;
use crate::security::ValidationPolicy;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("twilio.auth_token or twilio.request_validation.auth_token is required")]
    MissingAuthToken,

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be an absolute http or https URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Check the configuration for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.validation_auth_token().is_none() {
        errors.push(ValidationError::MissingAuthToken);
    }

    let validation = &config.twilio.request_validation;
    check_url(&mut errors, "twilio.request_validation.base_url_override", &validation.base_url_override);
    check_url(&mut errors, "twilio.request_validation.url_override", &validation.url_override);

    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "server.request_timeout_secs" });
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "server.max_body_bytes" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the configuration and build the policy it describes.
pub fn resolve_policy(config: &AppConfig) -> Result<ValidationPolicy, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let token = config
        .validation_auth_token()
        .ok_or_else(|| ConfigError::Validation(vec![ValidationError::MissingAuthToken]))?;
    let validation = &config.twilio.request_validation;

    Ok(ValidationPolicy::new(token)?
        .with_allow_local(validation.allow_local)
        .with_base_url_override(validation.base_url_override.clone())
        .with_url_override(validation.url_override.clone()))
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &Option<String>) {
    let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
        return;
    };
    let valid = url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
