//! Inbound demultiplexer for host-delivered traffic.
//!
//! The host delivers on a channel the page shares with other traffic, so
//! anything that is not a `logos_response` or `logos_event` is ignored
//! quietly. Handling is total: no input makes it fail or panic.

use crate::domain::events::{EventHub, FanOut};
use crate::domain::messages::{InboundMessage, RequestId};
use crate::domain::pending::{CallCorrelator, Resolution};
use crate::metrics::BridgeMetrics;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A waiting call resolved
    Resolved(RequestId),
    /// A waiting call rejected with the host's error
    Rejected(RequestId),
    /// A response arrived for no waiting call
    Unroutable(RequestId),
    /// An event fanned out to its subscribers
    Event {
        event_name: String,
        delivered: usize,
        faults: usize,
    },
    /// Not bridge traffic
    Ignored,
}

impl Dispatch {
    fn from_resolution(request_id: RequestId, resolution: Resolution) -> Self {
        match resolution {
            Resolution::Resolved => Dispatch::Resolved(request_id),
            Resolution::Rejected => Dispatch::Rejected(request_id),
            Resolution::Unroutable => Dispatch::Unroutable(request_id),
        }
    }
}

/// Routes responses to the correlator and events to the hub.
pub struct InboundDemux {
    correlator: Arc<CallCorrelator>,
    events: Arc<EventHub>,
    metrics: Arc<BridgeMetrics>,
}

impl InboundDemux {
    pub fn new(
        correlator: Arc<CallCorrelator>,
        events: Arc<EventHub>,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            correlator,
            events,
            metrics,
        }
    }

    /// Route an already-parsed message.
    pub fn handle(&self, raw: &Value) -> Dispatch {
        match InboundMessage::classify(raw) {
            Some(InboundMessage::CallResponse {
                request_id,
                result,
                error,
            }) => {
                let resolution = self.correlator.resolve(request_id, result, error);
                Dispatch::from_resolution(request_id, resolution)
            }
            Some(InboundMessage::Event { event_name, data }) => {
                let FanOut { delivered, faults } = self.events.dispatch(&event_name, &data);
                Dispatch::Event {
                    event_name,
                    delivered,
                    faults,
                }
            }
            None => {
                BridgeMetrics::incr(&self.metrics.messages_ignored);
                trace!("Ignoring non-bridge message");
                Dispatch::Ignored
            }
        }
    }

    /// Route raw channel text. Text that is not JSON is ignored.
    pub fn handle_raw(&self, text: &str) -> Dispatch {
        match serde_json::from_str::<Value>(text) {
            Ok(raw) => self.handle(&raw),
            Err(_) => {
                BridgeMetrics::incr(&self.metrics.messages_ignored);
                trace!("Ignoring unparseable channel text");
                Dispatch::Ignored
            }
        }
    }
}
