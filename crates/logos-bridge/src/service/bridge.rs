//! Bridge - owns the shared structures and wires them together.

use crate::domain::config::BridgeConfig;
use crate::domain::events::EventHub;
use crate::domain::messages::OutboundMessage;
use crate::domain::outbox::Outbox;
use crate::domain::pending::{CallCorrelator, PendingReply};
use crate::domain::proxy::{ModuleProxy, ProxyCache};
use crate::error::ConfigError;
use crate::handler::{Dispatch, InboundDemux};
use crate::metrics::{BridgeMetrics, MetricsSnapshot};
use crate::ports::HostChannel;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// One bridge instance: outbox, correlator, event hub, and proxy cache.
pub struct Bridge {
    config: BridgeConfig,
    outbox: Arc<Outbox>,
    correlator: Arc<CallCorrelator>,
    events: Arc<EventHub>,
    proxies: ProxyCache,
    demux: InboundDemux,
    metrics: Arc<BridgeMetrics>,
}

impl Bridge {
    /// Create a bridge after validating `config`.
    pub fn new(config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    pub(crate) fn build(config: BridgeConfig) -> Self {
        let metrics = Arc::new(BridgeMetrics::new());
        let outbox = Arc::new(Outbox::new());
        let correlator = Arc::new(CallCorrelator::new(
            Arc::clone(&outbox),
            config.request_timeout,
            Arc::clone(&metrics),
        ));
        let events = Arc::new(EventHub::new(Arc::clone(&metrics)));
        let proxies = ProxyCache::new(Arc::clone(&correlator));
        let demux = InboundDemux::new(
            Arc::clone(&correlator),
            Arc::clone(&events),
            Arc::clone(&metrics),
        );

        debug!(
            request_timeout_ms = config.request_timeout.as_millis(),
            "Bridge created"
        );

        Self {
            config,
            outbox,
            correlator,
            events,
            proxies,
            demux,
            metrics,
        }
    }

    /// Route one inbound message from the host.
    pub fn handle_message(&self, message: &Value) -> Dispatch {
        self.demux.handle(message)
    }

    /// Route raw channel text from the host.
    pub fn handle_raw(&self, text: &str) -> Dispatch {
        self.demux.handle_raw(text)
    }

    /// Take every queued request, in issue order.
    pub fn drain(&self) -> Vec<OutboundMessage> {
        let batch = self.outbox.drain();
        BridgeMetrics::add(&self.metrics.outbox_drained, batch.len() as u64);
        batch
    }

    /// Drain as a JSON array.
    pub fn drain_json(&self) -> Value {
        Value::Array(self.drain().iter().map(OutboundMessage::to_json).collect())
    }

    /// Issue `module.method(args)` directly.
    pub fn call(&self, module: &str, method: &str, args: Vec<Value>) -> PendingReply {
        self.correlator.issue_call(module, method, args)
    }

    /// Proxy for a host module
    pub fn module(&self, name: &str) -> Arc<ModuleProxy> {
        self.proxies.get_or_create(name)
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn correlator(&self) -> &Arc<CallCorrelator> {
        &self.correlator
    }

    pub fn proxies(&self) -> &ProxyCache {
        &self.proxies
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Current counter values
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Reject all in-flight calls. Subscriptions and proxies are kept.
    pub fn shutdown(&self) -> usize {
        let cancelled = self.correlator.shutdown();
        info!(cancelled = cancelled, "Bridge shut down");
        cancelled
    }
}

impl HostChannel for Bridge {
    fn drain(&self) -> Vec<OutboundMessage> {
        Bridge::drain(self)
    }

    fn deliver(&self, message: &Value) -> Dispatch {
        self.handle_message(message)
    }
}
