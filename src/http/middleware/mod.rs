//! Request middleware.

pub mod twilio_validation;

pub use twilio_validation::{validate_twilio_request, PolicySource, TwilioValidation};
