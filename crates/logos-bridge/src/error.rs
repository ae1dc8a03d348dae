//! Error types for the Logos bridge

use crate::domain::messages::RequestId;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single remote call, surfaced through its `PendingReply`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No response arrived before the call's deadline.
    #[error("Request timeout: {module}.{method} (request {request_id}) after {}ms", timeout.as_millis())]
    RequestTimeout {
        request_id: RequestId,
        module: String,
        method: String,
        timeout: Duration,
    },

    /// The host answered with an explicit error string (propagated verbatim).
    #[error("{0}")]
    HostReported(String),

    /// The bridge was torn down while the call was in flight.
    #[error("Bridge shut down before a response arrived")]
    BridgeShutdown,

    /// The result could not be converted into the requested type.
    #[error("Failed to decode result: {0}")]
    Decode(String),
}

impl BridgeError {
    /// True if the call failed because its deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::RequestTimeout { .. })
    }
}

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    /// Environment variable held an unparseable duration
    #[error("invalid duration in {var}: {value}")]
    InvalidDuration { var: &'static str, value: String },
}
