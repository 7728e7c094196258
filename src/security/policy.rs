//! Resolved validation settings.

use thiserror::Error;

use crate::security::signature::RequestSigner;

/// Errors raised while building a [`ValidationPolicy`].
#[derive(Debug, Error)]
pub enum PolicyError {
    /// No auth token was configured.
    #[error("auth token is required for request validation")]
    MissingAuthToken,

    /// The token could not be used as an HMAC key.
    #[error("auth token cannot be used as an HMAC key")]
    InvalidAuthToken,
}

/// An immutable, fully-resolved set of validation settings.
///
/// Holding one guarantees a usable signing key: construction is the only
/// place an empty auth token can be caught.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    signer: RequestSigner,
    /// Let requests from this machine skip signature checks.
    pub allow_local: bool,
    /// Full URL to sign instead of the reconstructed request URL.
    pub url_override: Option<String>,
    /// Scheme and host prefix to sign in front of the request path and query.
    pub base_url_override: Option<String>,
}

impl ValidationPolicy {
    /// Create a policy with local bypass enabled and no URL overrides.
    pub fn new(auth_token: &str) -> Result<Self, PolicyError> {
        Ok(Self {
            signer: RequestSigner::new(auth_token)?,
            allow_local: true,
            url_override: None,
            base_url_override: None,
        })
    }

    pub fn with_allow_local(mut self, allow_local: bool) -> Self {
        self.allow_local = allow_local;
        self
    }

    /// Sign against a fixed URL. Empty strings clear the override.
    pub fn with_url_override(mut self, url: Option<impl Into<String>>) -> Self {
        self.url_override = non_empty(url);
        self
    }

    /// Sign against a fixed scheme and host. Empty strings clear the override.
    pub fn with_base_url_override(mut self, base_url: Option<impl Into<String>>) -> Self {
        self.base_url_override = non_empty(base_url);
        self
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }
}

fn non_empty(value: Option<impl Into<String>>) -> Option<String> {
    value.map(Into::into).filter(|v| !v.is_empty())
}
