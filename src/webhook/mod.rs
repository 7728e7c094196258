//! Typed webhook payloads.
//!
//! Bind a webhook's form body with `axum::Form`:
//!
//! ```ignore
//! async fn incoming_sms(Form(sms): Form<SmsRequest>) -> StatusCode { ... }
//! ```
//!
//! Field names follow the platform's PascalCase parameters. Every field is
//! optional or defaulted since which parameters are sent depends on the
//! channel and event.

mod de;
pub mod sms;
pub mod voice;

pub use sms::{SmsRequest, SmsStatusCallbackRequest};
pub use voice::{StatusCallbackRequest, VoiceRequest};

use serde::{Deserialize, Serialize};

/// Parameters common to every webhook.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TwilioRequest {
    /// The account this request is associated with.
    pub account_sid: Option<String>,

    /// Phone number or client identifier of the party that initiated the call or message.
    pub from: Option<String>,

    /// Phone number or client identifier of the recipient.
    pub to: Option<String>,

    pub from_city: Option<String>,
    pub from_state: Option<String>,
    pub from_zip: Option<String>,
    pub from_country: Option<String>,

    pub to_city: Option<String>,
    pub to_state: Option<String>,
    pub to_zip: Option<String>,
    pub to_country: Option<String>,
}
