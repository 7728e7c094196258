//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (ConnectInfo<ConnectionAddrs>)
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/twilio_validation.rs
//!         → extract.rs (ValidationRequest + replayable body)
//!         → security::evaluate → 403 on REJECT
//!     → webhook handler (typed form binding)
//! ```

pub mod extract;
pub mod middleware;
pub mod server;

pub use middleware::{validate_twilio_request, TwilioValidation};
pub use server::WebhookServer;
