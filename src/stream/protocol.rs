// Wire format of the telemetry proxy
//
// Inbound:  {"type": "log"|"thought"|"state"|"chat", "payload": <string|object>}
// Outbound: {"type": "input", "payload": <string>}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Thought shown before the first `thought` message arrives
pub const INITIAL_THOUGHT: &str = "Initializing...";

/// Latest structured brain state
///
/// The four activation arrays follow region order: encoder, decoder, memory,
/// cognitive. Elements are expected in 0.0 ~ 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainState {
    pub language_encoder_activity: Vec<f64>,
    pub language_decoder_activity: Vec<f64>,
    pub memory_center_activity: Vec<f64>,
    pub cognitive_center_activity: Vec<f64>,
    pub thought: String,
    pub input: String,
}

impl BrainState {
    /// State before any telemetry has been received
    pub fn initial() -> Self {
        Self {
            thought: INITIAL_THOUGHT.to_string(),
            ..Self::default()
        }
    }

    /// Activation arrays in region order
    pub fn region_activations(&self) -> [&[f64]; 4] {
        [
            &self.language_encoder_activity,
            &self.language_decoder_activity,
            &self.memory_center_activity,
            &self.cognitive_center_activity,
        ]
    }
}

/// Discriminant of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Log,
    Thought,
    Chat,
    State,
    Unknown(String),
}

impl MessageKind {
    fn parse(kind: &str) -> Self {
        match kind {
            "log" => MessageKind::Log,
            "thought" => MessageKind::Thought,
            "chat" => MessageKind::Chat,
            "state" => MessageKind::State,
            other => MessageKind::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInbound {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// A decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub kind: MessageKind,
    pub payload: Value,
}

impl InboundMessage {
    /// Decode a text frame. Anything that is not an object with a string
    /// `type` field is an error.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawInbound = serde_json::from_str(text)?;
        Ok(Self {
            kind: MessageKind::parse(&raw.kind),
            payload: raw.payload,
        })
    }

    /// Payload as display text
    ///
    /// Strings are taken verbatim; any other JSON value is shown as its
    /// compact JSON form, and a missing payload as an empty string.
    pub fn payload_text(&self) -> String {
        match &self.payload {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Outbound<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    payload: &'a str,
}

/// Encode user input for the proxy
pub fn encode_input(payload: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Outbound {
        kind: "input",
        payload,
    })
}
