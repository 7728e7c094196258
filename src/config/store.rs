//! Live validation policy.
//!
//! Readers take an immutable snapshot per request; reloads swap the whole
//! policy atomically so a request never sees fields from two versions.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::ConfigError;
use crate::config::schema::AppConfig;
use crate::config::validation::resolve_policy;
use crate::security::ValidationPolicy;

/// Shared, reloadable handle to the current [`ValidationPolicy`].
#[derive(Clone, Debug)]
pub struct PolicyStore {
    inner: Arc<ArcSwap<ValidationPolicy>>,
}

impl PolicyStore {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(policy)),
        }
    }

    /// Build a store from configuration, failing if it does not resolve.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(resolve_policy(config)?))
    }

    /// The policy in force right now.
    pub fn snapshot(&self) -> Arc<ValidationPolicy> {
        self.inner.load_full()
    }

    /// Replace the current policy.
    pub fn store(&self, policy: ValidationPolicy) {
        self.inner.store(Arc::new(policy));
    }

    /// Resolve a reloaded config and swap it in.
    ///
    /// On error the current policy stays in force.
    pub fn apply(&self, config: &AppConfig) -> Result<(), ConfigError> {
        match resolve_policy(config) {
            Ok(policy) => {
                self.store(policy);
                tracing::info!(
                    allow_local = config.twilio.request_validation.allow_local,
                    base_url_override = ?config.twilio.request_validation.base_url_override,
                    url_override = ?config.twilio.request_validation.url_override,
                    "Request validation policy reloaded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Rejected reloaded config: {}. Keeping current policy.", e);
                Err(e)
            }
        }
    }
}
