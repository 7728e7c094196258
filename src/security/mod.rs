//! Request-origin validation subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming webhook (already extracted by the http layer):
//!     → request.rs (ValidationRequest: method, URL parts, form, signature, peer info)
//!     → locality.rs (local bypass unless a proxy is in the path)
//!     → validator.rs (canonical URL, decide ALLOW / REJECT)
//!     → signature.rs (sorted params, HMAC-SHA1, Base64, constant-time compare)
//! ```
//!
//! # Design Decisions
//! - Pure functions over plain values; no framework types cross this boundary
//! - A policy cannot exist without a non-empty auth token
//! - Malformed input degrades to REJECT, never to an error

pub mod locality;
pub mod policy;
pub mod request;
pub mod signature;
pub mod validator;

pub use policy::{PolicyError, ValidationPolicy};
pub use request::{FormParameters, ValidationRequest};
pub use signature::RequestSigner;
pub use validator::{canonical_url, evaluate, is_valid, Decision};

/// Header carrying the platform's request signature.
pub const X_TWILIO_SIGNATURE: &str = "x-twilio-signature";
