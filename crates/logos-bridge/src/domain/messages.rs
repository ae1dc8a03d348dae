//! Wire payloads exchanged with the host transport.
//!
//! Outbound calls are queued as `logos_request` records; the host answers with
//! `logos_response` records and pushes `logos_event` notifications. Payload
//! values stay opaque (`serde_json::Value`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Tag of an outbound call request.
pub const REQUEST_TAG: &str = "logos_request";
/// Tag of an inbound call response.
pub const RESPONSE_TAG: &str = "logos_response";
/// Tag of an inbound event notification.
pub const EVENT_TAG: &str = "logos_event";

/// Identifier correlating a request with its response.
///
/// Allocated from a monotonically increasing counter starting at 1, so an id is
/// never 0 and never reused within the lifetime of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer as it appears on the wire.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Message queued in the outbox for the host to drain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "logos_request")]
    CallRequest {
        #[serde(rename = "requestId")]
        request_id: RequestId,
        module: String,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

impl OutboundMessage {
    /// Build a call request.
    pub fn call(
        request_id: RequestId,
        module: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        OutboundMessage::CallRequest {
            request_id,
            module: module.into(),
            method: method.into(),
            args,
        }
    }

    /// Id of the request this message carries.
    pub fn request_id(&self) -> RequestId {
        match self {
            OutboundMessage::CallRequest { request_id, .. } => *request_id,
        }
    }

    /// JSON form handed to the transport.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Message delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// Outcome of an earlier call. A non-null `error` means failure.
    #[serde(rename = "logos_response")]
    CallResponse {
        #[serde(rename = "requestId", deserialize_with = "wire_request_id")]
        request_id: RequestId,
        #[serde(default)]
        result: Value,
        #[serde(
            default,
            deserialize_with = "host_error",
            skip_serializing_if = "Option::is_none"
        )]
        error: Option<String>,
    },

    /// Host-originated notification fanned out to subscribers.
    #[serde(rename = "logos_event")]
    Event {
        #[serde(rename = "eventName")]
        event_name: String,
        #[serde(default)]
        data: Value,
    },
}

/// Accepts integral JSON numbers, including floats such as `4.0`.
fn wire_request_id<'de, D>(deserializer: D) -> Result<RequestId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let id = raw.as_u64().or_else(|| {
        raw.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    });
    id.map(RequestId::new)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid request id: {raw}")))
}

/// Strings pass through verbatim; any other non-null value becomes its JSON text.
fn host_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(message) => Some(message),
        other => Some(other.to_string()),
    })
}

impl InboundMessage {
    /// Classify raw channel traffic.
    ///
    /// Returns `None` for anything this bridge does not own: non-objects,
    /// objects without a `type` tag, unknown tags, and recognized tags whose
    /// body does not match the expected shape. Never fails.
    pub fn classify(raw: &Value) -> Option<Self> {
        let tag = raw.get("type")?.as_str()?;
        if tag != RESPONSE_TAG && tag != EVENT_TAG {
            return None;
        }
        InboundMessage::deserialize(raw).ok()
    }

    /// Successful response.
    pub fn response(request_id: RequestId, result: Value) -> Self {
        InboundMessage::CallResponse {
            request_id,
            result,
            error: None,
        }
    }

    /// Failed response carrying a host error string.
    pub fn failure(request_id: RequestId, error: impl Into<String>) -> Self {
        InboundMessage::CallResponse {
            request_id,
            result: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Event notification.
    pub fn event(event_name: impl Into<String>, data: Value) -> Self {
        InboundMessage::Event {
            event_name: event_name.into(),
            data,
        }
    }

    /// JSON form as the host would inject it.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
