//! Inbound call events posted by the voice-agent platform's webhook.
//!
//! The envelope is validated field by field against the raw JSON first so
//! that callers get a precise message for each malformed field, then
//! deserialized into the typed structure. Past those checks nothing else can
//! reject an event: auxiliary fields with an unexpected type read as `None`,
//! and unknown fields are kept in `extra` maps rather than dropped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallEventError {
    #[error("Request body must be valid JSON")]
    InvalidJson,

    #[error("Type field is required and must be a string")]
    Type,

    #[error("Event timestamp field is required and must be a number")]
    EventTimestamp,

    #[error("Data field is required and must be an object")]
    Data,

    #[error("User ID field must be a string, null, or undefined")]
    UserId,

    #[error("Conversation ID field must be a string if provided")]
    ConversationId,

    #[error("Transcript field must be an array if provided")]
    Transcript,

    #[error("Analysis field must be an object if provided")]
    Analysis,
}

/// One completed phone conversation, as delivered by the webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub event_timestamp: f64,
    pub data: CallData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallData {
    #[serde(default, deserialize_with = "lenient")]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    /// The call platform's subject identifier, when it has one.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_turns")]
    pub transcript: Option<Vec<TranscriptTurn>>,
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<CallMetadata>,
    #[serde(default, deserialize_with = "lenient")]
    pub analysis: Option<CallAnalysis>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single utterance in the call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptTurn {
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    /// `None` for turns that only carry tool activity.
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub time_in_call_secs: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallMetadata {
    #[serde(default, deserialize_with = "lenient")]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub call_duration_secs: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub authorization_method: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub termination_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallAnalysis {
    #[serde(default, deserialize_with = "lenient")]
    pub call_successful: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub transcript_summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallEvent {
    /// Parse a webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CallEventError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| CallEventError::InvalidJson)?;
        Self::from_value(value)
    }

    /// Validate the envelope shape, then deserialize it.
    pub fn from_value(value: Value) -> Result<Self, CallEventError> {
        validate_envelope(&value)?;
        // Only the validated fields are read strictly, so this cannot fail on
        // a body that passed the envelope checks.
        serde_json::from_value(value).map_err(|_| CallEventError::Data)
    }

    /// The subject identifier supplied by the call platform, ignoring blanks.
    pub fn subject_id(&self) -> Option<&str> {
        self.data.user_id.as_deref().filter(|id| !id.is_empty())
    }

    /// The source conversation id, ignoring blanks.
    pub fn conversation_id(&self) -> Option<&str> {
        self.data.conversation_id.as_deref().filter(|id| !id.is_empty())
    }
}

fn validate_envelope(value: &Value) -> Result<(), CallEventError> {
    let body = value.as_object().ok_or(CallEventError::Type)?;

    if !body
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty())
    {
        return Err(CallEventError::Type);
    }

    if !body.get("event_timestamp").is_some_and(Value::is_number) {
        return Err(CallEventError::EventTimestamp);
    }

    let data = body
        .get("data")
        .and_then(Value::as_object)
        .ok_or(CallEventError::Data)?;

    // Optional fields may be absent or null; otherwise they must have the
    // documented type.
    let present = |name: &str| data.get(name).filter(|v| !v.is_null());

    if present("user_id").is_some_and(|v| !v.is_string()) {
        return Err(CallEventError::UserId);
    }
    if present("conversation_id").is_some_and(|v| !v.is_string()) {
        return Err(CallEventError::ConversationId);
    }
    if present("transcript").is_some_and(|v| !v.is_array()) {
        return Err(CallEventError::Transcript);
    }
    if present("analysis").is_some_and(|v| !v.is_object()) {
        return Err(CallEventError::Analysis);
    }

    Ok(())
}

/// Read an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Read the turn list. A turn that is not an object becomes an empty turn so
/// the line count still matches the call.
fn lenient_turns<'de, D>(deserializer: D) -> Result<Option<Vec<TranscriptTurn>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(turns) => Ok(Some(
            turns
                .into_iter()
                .map(|turn| serde_json::from_value(turn).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}
