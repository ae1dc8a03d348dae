//! Prometheus metrics for Logos bridge hosts.
//!
//! All metrics follow the naming convention: `logos_<component>_<metric>_<unit>`
//!
//! Bridge counters live in the bridge itself (`BridgeMetrics`); hosts mirror
//! them here with [`record_snapshot`] so a scrape sees the same numbers.

use lazy_static::lazy_static;
use logos_bridge::MetricsSnapshot;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BRIDGE METRICS
    // =========================================================================

    /// Calls by lifecycle stage (issued, resolved, rejected, timed_out, cancelled)
    pub static ref BRIDGE_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("logos_bridge_calls_total", "Calls by lifecycle stage"),
        &["stage"]
    ).expect("metric creation failed");

    /// Calls currently awaiting a response
    pub static ref BRIDGE_CALLS_IN_FLIGHT: IntGauge = IntGauge::new(
        "logos_bridge_calls_in_flight",
        "Calls issued but not yet settled"
    ).expect("metric creation failed");

    /// Responses that matched no waiting call
    pub static ref BRIDGE_UNROUTABLE_RESPONSES: IntCounter = IntCounter::new(
        "logos_bridge_unroutable_responses_total",
        "Responses for unknown or already settled request ids"
    ).expect("metric creation failed");

    /// Events fanned out to subscribers
    pub static ref BRIDGE_EVENTS_DISPATCHED: IntCounter = IntCounter::new(
        "logos_bridge_events_dispatched_total",
        "Inbound events dispatched to subscribers"
    ).expect("metric creation failed");

    /// Subscriber callbacks that failed
    pub static ref BRIDGE_SUBSCRIBER_FAULTS: IntCounter = IntCounter::new(
        "logos_bridge_subscriber_faults_total",
        "Subscriber callbacks that returned an error or panicked"
    ).expect("metric creation failed");

    /// Channel traffic that was not bridge traffic
    pub static ref BRIDGE_MESSAGES_IGNORED: IntCounter = IntCounter::new(
        "logos_bridge_messages_ignored_total",
        "Inbound messages ignored as foreign traffic"
    ).expect("metric creation failed");

    /// Requests handed to the host transport
    pub static ref BRIDGE_OUTBOX_DRAINED: IntCounter = IntCounter::new(
        "logos_bridge_outbox_drained_total",
        "Outbound messages drained by the host"
    ).expect("metric creation failed");

    // =========================================================================
    // HOST METRICS
    // =========================================================================

    /// Module invocations by module and outcome (ok, error)
    pub static ref HOST_MODULE_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("logos_host_module_calls_total", "Host module invocations"),
        &["module", "outcome"]
    ).expect("metric creation failed");

    /// Duration of one drain/execute/deliver cycle
    pub static ref HOST_PUMP_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "logos_host_pump_duration_seconds",
            "Time spent in one host pump cycle"
        ).buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0])
    ).expect("metric creation failed");
}

/// Handle proving the metrics were registered
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    _private: (),
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; later calls find the metrics registered.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Bridge
        Box::new(BRIDGE_CALLS.clone()),
        Box::new(BRIDGE_CALLS_IN_FLIGHT.clone()),
        Box::new(BRIDGE_UNROUTABLE_RESPONSES.clone()),
        Box::new(BRIDGE_EVENTS_DISPATCHED.clone()),
        Box::new(BRIDGE_SUBSCRIBER_FAULTS.clone()),
        Box::new(BRIDGE_MESSAGES_IGNORED.clone()),
        Box::new(BRIDGE_OUTBOX_DRAINED.clone()),
        // Host
        Box::new(HOST_MODULE_CALLS.clone()),
        Box::new(HOST_PUMP_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { _private: () })
}

/// Bring the Prometheus counters up to a bridge snapshot.
///
/// Counters only move forward: each is advanced by the difference between
/// the snapshot and its current value.
pub fn record_snapshot(snapshot: &MetricsSnapshot) {
    let stages = [
        ("issued", snapshot.calls_issued),
        ("resolved", snapshot.calls_resolved),
        ("rejected", snapshot.calls_rejected),
        ("timed_out", snapshot.calls_timed_out),
        ("cancelled", snapshot.calls_cancelled),
    ];
    for (stage, value) in stages {
        advance(&BRIDGE_CALLS.with_label_values(&[stage]), value);
    }

    advance(&BRIDGE_UNROUTABLE_RESPONSES, snapshot.unroutable_responses);
    advance(&BRIDGE_EVENTS_DISPATCHED, snapshot.events_dispatched);
    advance(&BRIDGE_SUBSCRIBER_FAULTS, snapshot.subscriber_faults);
    advance(&BRIDGE_MESSAGES_IGNORED, snapshot.messages_ignored);
    advance(&BRIDGE_OUTBOX_DRAINED, snapshot.outbox_drained);

    let settled = snapshot.calls_resolved
        + snapshot.calls_rejected
        + snapshot.calls_timed_out
        + snapshot.calls_cancelled;
    let in_flight = snapshot.calls_issued.saturating_sub(settled);
    BRIDGE_CALLS_IN_FLIGHT.set(i64::try_from(in_flight).unwrap_or(i64::MAX));
}

fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}

/// Encode all metrics as Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
