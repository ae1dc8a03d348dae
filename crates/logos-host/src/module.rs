//! Host module port and the context modules run with.

use async_trait::async_trait;
use logos_bridge::InboundMessage;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Why a host-side call failed. The `Display` text is what the page sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostCallError {
    /// No module registered under this name.
    #[error("Module not connected: {0}")]
    ModuleNotConnected(String),

    /// The module does not implement the method.
    #[error("Unknown method: {module}.{method}")]
    UnknownMethod { module: String, method: String },

    /// More positional arguments than the host accepts.
    #[error("Too many arguments: {given} (max {max})")]
    TooManyArguments { given: usize, max: usize },

    /// Arguments had the wrong count or type.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The module ran and failed.
    #[error("{0}")]
    Failed(String),
}

impl HostCallError {
    pub fn unknown_method(module: &str, method: &str) -> Self {
        HostCallError::UnknownMethod {
            module: module.to_string(),
            method: method.to_string(),
        }
    }
}

/// A module the host exposes to page code.
#[async_trait]
pub trait HostModule: Send + Sync {
    /// Name page code uses to reach this module
    fn name(&self) -> &str;

    /// Execute `method` with positional arguments.
    async fn call(
        &self,
        method: &str,
        args: &[Value],
        ctx: &HostContext,
    ) -> Result<Value, HostCallError>;
}

/// Handle modules use to push events to the page.
///
/// Emitted events are queued and delivered after the responses of the
/// current pump cycle.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    pending_events: Arc<Mutex<Vec<InboundMessage>>>,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event_name` with `data` for delivery.
    pub fn emit(&self, event_name: &str, data: Value) {
        self.pending_events
            .lock()
            .push(InboundMessage::event(event_name, data));
    }

    /// Take all queued events in emit order.
    pub fn take_events(&self) -> Vec<InboundMessage> {
        std::mem::take(&mut *self.pending_events.lock())
    }
}

/// Numeric positional argument `index`, or an `InvalidArguments` error.
pub fn number_arg(args: &[Value], index: usize) -> Result<&serde_json::Number, HostCallError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(n),
        Some(other) => Err(HostCallError::InvalidArguments(format!(
            "argument {index} must be a number, got {other}"
        ))),
        None => Err(HostCallError::InvalidArguments(format!(
            "missing argument {index}"
        ))),
    }
}
