//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the webhook
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Account credentials and request validation settings.
    pub twilio: TwilioConfig,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Account-level settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TwilioConfig {
    /// Account auth token, used when request validation has none of its own.
    pub auth_token: Option<String>,

    /// Webhook request validation.
    pub request_validation: RequestValidationConfig,
}

/// Webhook request validation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestValidationConfig {
    /// Auth token used to check signatures (falls back to `twilio.auth_token`).
    pub auth_token: Option<String>,

    /// Skip validation for requests from this machine.
    pub allow_local: bool,

    /// Scheme and host to sign instead of the ones this process observes
    /// (e.g., "https://hooks.example.com" behind a load balancer).
    pub base_url_override: Option<String>,

    /// Exact URL to sign for every request.
    pub url_override: Option<String>,
}

impl Default for RequestValidationConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            allow_local: true,
            base_url_override: None,
            url_override: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Largest form body buffered for signature checks.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl AppConfig {
    /// Treat empty strings as unset, the way an empty value in a config file
    /// or environment is meant.
    pub fn sanitize(&mut self) {
        clear_if_empty(&mut self.twilio.auth_token);
        let validation = &mut self.twilio.request_validation;
        clear_if_empty(&mut validation.auth_token);
        clear_if_empty(&mut validation.base_url_override);
        clear_if_empty(&mut validation.url_override);
    }

    /// Auth token for request validation, after fallback.
    pub fn validation_auth_token(&self) -> Option<&str> {
        self.twilio
            .request_validation
            .auth_token
            .as_deref()
            .or(self.twilio.auth_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

fn clear_if_empty(value: &mut Option<String>) {
    if value.as_deref() == Some("") {
        *value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.twilio.request_validation.allow_local);
        assert!(config.validation_auth_token().is_none());
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [twilio]
            auth_token = "My Twilio:AuthToken"

            [twilio.request_validation]
            auth_token = "My Twilio:RequestValidation:AuthToken"
            allow_local = false
            base_url_override = "MY URL OVERRIDE"

            [server]
            bind_address = "127.0.0.1:5000"
            "#,
        )
        .unwrap();

        let validation = &config.twilio.request_validation;
        assert!(!validation.allow_local);
        assert_eq!(validation.base_url_override.as_deref(), Some("MY URL OVERRIDE"));
        assert_eq!(
            config.validation_auth_token(),
            Some("My Twilio:RequestValidation:AuthToken")
        );
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.server.request_timeout_secs, 30);
    }

    #[test]
    fn test_auth_token_fallback() {
        let config: AppConfig = toml::from_str(
            r#"
            [twilio]
            auth_token = "My Twilio:AuthToken"
            "#,
        )
        .unwrap();
        assert_eq!(config.validation_auth_token(), Some("My Twilio:AuthToken"));
    }

    #[test]
    fn test_sanitize_empty_strings() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [twilio]
            auth_token = "fallback"

            [twilio.request_validation]
            auth_token = ""
            base_url_override = ""
            "#,
        )
        .unwrap();
        config.sanitize();

        let validation = &config.twilio.request_validation;
        assert!(validation.auth_token.is_none());
        assert!(validation.base_url_override.is_none());
        assert_eq!(config.validation_auth_token(), Some("fallback"));
    }
}
