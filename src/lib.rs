//! Twilio webhook integration for axum.
//!
//! Verifies that inbound webhook requests were signed by Twilio, binds their
//! form bodies into typed requests, and carries the configuration, reload
//! and observability plumbing around them.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;
pub mod webhook;

pub use config::{AppConfig, PolicyStore};
pub use http::{validate_twilio_request, TwilioValidation, WebhookServer};
pub use lifecycle::Shutdown;
pub use security::{is_valid, ValidationPolicy, ValidationRequest};
