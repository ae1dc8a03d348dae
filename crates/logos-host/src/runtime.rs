//! # Host Runtime
//!
//! Plays the part of the native side of the webview. One pump cycle:
//!
//! 1. Drain the bridge outbox
//! 2. Encode the batch to JSON text and decode it again, as a webview
//!    transport would carry it
//! 3. Execute each request against the module registry, in order
//! 4. Deliver a `logos_response` per request
//! 5. Deliver the events modules emitted during the cycle

use crate::config::HostConfig;
use crate::module::{HostCallError, HostContext};
use crate::registry::ModuleRegistry;
use logos_bridge::{HostChannel, InboundMessage, OutboundMessage, RequestId};
use logos_telemetry::{time_histogram, HOST_MODULE_CALLS, HOST_PUMP_DURATION};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum HostError {
    /// A drained batch could not be put on the wire.
    #[error("failed to encode outbox batch: {0}")]
    Encode(#[source] serde_json::Error),

    /// Wire text was not a JSON array.
    #[error("failed to decode outbox batch: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Counts for one pump cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Requests drained and executed
    pub requests: usize,
    /// Requests answered with an error string
    pub failed: usize,
    /// Drained entries that were not call requests
    pub malformed: usize,
    /// Events delivered
    pub events: usize,
}

impl PumpReport {
    pub fn is_idle(&self) -> bool {
        *self == PumpReport::default()
    }
}

/// Executes drained calls against registered modules.
pub struct HostRuntime {
    channel: Arc<dyn HostChannel>,
    registry: Arc<ModuleRegistry>,
    context: HostContext,
    config: HostConfig,
}

impl HostRuntime {
    pub fn new(
        channel: Arc<dyn HostChannel>,
        registry: Arc<ModuleRegistry>,
        config: HostConfig,
    ) -> Self {
        Self {
            channel,
            registry,
            context: HostContext::new(),
            config,
        }
    }

    /// Context handed to modules; events emitted here go out on the next delivery.
    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Run one drain/execute/deliver cycle.
    pub async fn pump(&self) -> Result<PumpReport, HostError> {
        let _timer = time_histogram!(HOST_PUMP_DURATION);
        let mut report = PumpReport::default();

        let batch = self.channel.drain();
        let wire = if batch.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&batch).map_err(HostError::Encode)?)
        };

        if let Some(wire) = wire {
            let entries: Vec<Value> = serde_json::from_str(&wire).map_err(HostError::Decode)?;
            for entry in entries {
                match serde_json::from_value::<OutboundMessage>(entry) {
                    Ok(OutboundMessage::CallRequest {
                        request_id,
                        module,
                        method,
                        args,
                    }) => {
                        report.requests += 1;
                        if !self.answer(request_id, &module, &method, args).await {
                            report.failed += 1;
                        }
                    }
                    Err(e) => {
                        report.malformed += 1;
                        warn!(error = %e, "Dropping malformed outbox entry");
                    }
                }
            }
        }

        for event in self.context.take_events() {
            self.channel.deliver(&event.to_json());
            report.events += 1;
        }

        if !report.is_idle() {
            debug!(
                requests = report.requests,
                failed = report.failed,
                events = report.events,
                "Pump cycle complete"
            );
        }
        Ok(report)
    }

    /// Execute one call and deliver its response. Returns false if it failed.
    async fn answer(
        &self,
        request_id: RequestId,
        module: &str,
        method: &str,
        args: Vec<Value>,
    ) -> bool {
        let outcome = self.execute(module, method, &args).await;
        let succeeded = outcome.is_ok();
        let response = match outcome {
            Ok(result) => InboundMessage::response(request_id, result),
            Err(e) => {
                warn!(
                    request_id = %request_id,
                    module = module,
                    method = method,
                    error = %e,
                    "Host call failed"
                );
                InboundMessage::failure(request_id, e.to_string())
            }
        };
        self.channel.deliver(&response.to_json());
        succeeded
    }

    async fn execute(
        &self,
        module: &str,
        method: &str,
        args: &[Value],
    ) -> Result<Value, HostCallError> {
        if args.len() > self.config.max_args {
            return Err(HostCallError::TooManyArguments {
                given: args.len(),
                max: self.config.max_args,
            });
        }

        let Some(target) = self.registry.get(module) else {
            HOST_MODULE_CALLS
                .with_label_values(&["unknown", "error"])
                .inc();
            return Err(HostCallError::ModuleNotConnected(module.to_string()));
        };

        let result = target.call(method, args, &self.context).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        HOST_MODULE_CALLS
            .with_label_values(&[target.name(), outcome])
            .inc();
        result
    }

    /// Pump every `poll_interval` until `shutdown` flips to true or closes.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis(),
            modules = ?self.registry.names(),
            "Host runtime started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.pump().await {
                        error!(error = %e, "Pump cycle failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Host runtime shutdown signal received");
                        break;
                    }
                }
            }
        }
    }
}
