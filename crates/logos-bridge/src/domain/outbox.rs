//! Outbox - pending outbound messages awaiting a host drain.
//!
//! The webview side cannot push to the host; it can only queue. The host
//! transport polls `drain()` whenever it is ready to forward a batch.

use crate::domain::messages::OutboundMessage;
use parking_lot::Mutex;
use serde_json::Value;

/// Append-only queue of outbound messages.
///
/// `drain()` swaps the whole queue out under the lock, so a concurrent
/// `append()` lands either in the returned batch or in the next one, never
/// both and never neither.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: Mutex<Vec<OutboundMessage>>,
}

impl Outbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the tail.
    pub fn append(&self, message: OutboundMessage) {
        self.queue.lock().push(message);
    }

    /// Take every queued message in append order, leaving the outbox empty.
    ///
    /// An empty outbox yields an empty batch.
    pub fn drain(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.queue.lock())
    }

    /// Drain as a JSON array, the form a webview transport forwards verbatim.
    pub fn drain_json(&self) -> Value {
        Value::Array(self.drain().iter().map(OutboundMessage::to_json).collect())
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// True if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
