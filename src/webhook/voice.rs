//! Voice webhooks.

use serde::{Deserialize, Serialize};

use crate::webhook::de::number_from_str;
use crate::webhook::TwilioRequest;

/// An incoming call, or a step within one (gather, record).
///
/// See <https://www.twilio.com/docs/voice/twiml#request-parameters>.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VoiceRequest {
    #[serde(flatten)]
    pub common: TwilioRequest,

    /// A unique identifier for this call.
    pub call_sid: Option<String>,

    /// One of queued, ringing, in-progress, completed, busy, failed, no-answer.
    pub call_status: Option<String>,

    pub api_version: Option<String>,

    /// inbound, outbound-api or outbound-dial.
    pub direction: Option<String>,

    /// Number the call was forwarded from, if the carrier supplies it.
    pub forwarded_from: Option<String>,

    /// Caller ID name, when caller name lookup is enabled.
    pub caller_name: Option<String>,

    /// Keys pressed during a gather.
    pub digits: Option<String>,

    /// Transcribed speech from a speech gather.
    pub speech_result: Option<String>,

    /// Transcription confidence between 0.0 and 1.0.
    pub confidence: Option<String>,

    pub recording_url: Option<String>,
    pub recording_sid: Option<String>,
    pub recording_duration: Option<String>,
}

/// The final callback after a call has ended.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StatusCallbackRequest {
    #[serde(flatten)]
    pub call: VoiceRequest,

    /// Duration in seconds of the just-completed call.
    #[serde(deserialize_with = "number_from_str")]
    pub call_duration: f32,

    pub called: Option<String>,
    pub caller: Option<String>,

    #[serde(deserialize_with = "number_from_str")]
    pub duration: f32,
}
