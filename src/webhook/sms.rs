//! Messaging webhooks.

use serde::{Deserialize, Serialize};

use crate::webhook::de::number_from_str;
use crate::webhook::TwilioRequest;

/// An incoming message.
///
/// See <https://www.twilio.com/docs/messaging/guides/webhook-request>.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SmsRequest {
    #[serde(flatten)]
    pub common: TwilioRequest,

    /// A 34 character unique identifier for the message.
    pub message_sid: Option<String>,

    /// Same value as `message_sid`, kept for older integrations.
    pub sms_sid: Option<String>,

    /// Text body of the message.
    pub body: Option<String>,

    pub message_status: Option<String>,

    /// Opt-out keyword category, when the message was an opt-out.
    pub opt_out_type: Option<String>,

    pub messaging_service_sid: Option<String>,

    /// Number of media items attached to the message.
    #[serde(deserialize_with = "number_from_str")]
    pub num_media: u32,

    /// Number of media items from a "Click to WhatsApp" advertisement.
    #[serde(deserialize_with = "number_from_str")]
    pub referral_num_media: u32,

    #[serde(deserialize_with = "number_from_str")]
    pub num_segments: u32,
}

/// A delivery status update for an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SmsStatusCallbackRequest {
    #[serde(flatten)]
    pub message: SmsRequest,

    /// Error code for failed or undelivered messages.
    pub error_code: Option<String>,

    /// Installed Channel SID, when sent through a Channel.
    pub channel_install_sid: Option<String>,

    /// Error reported by the Channel when delivery failed.
    pub channel_status_message: Option<String>,

    /// Channel prefix identifying which channel carried the message.
    pub channel_prefix: Option<String>,

    /// Post-delivery event such as `READ`.
    pub event_type: Option<String>,
}
