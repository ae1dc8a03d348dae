//! Traffic counters for a bridge instance.
//!
//! Counts what the bridge otherwise swallows silently (late responses,
//! subscriber faults, foreign channel traffic) next to the call lifecycle,
//! so hosts can export timeout and drop rates.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for bridge operations
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// Calls handed to the correlator
    pub calls_issued: AtomicU64,
    /// Calls resolved with a result
    pub calls_resolved: AtomicU64,
    /// Calls rejected with a host error
    pub calls_rejected: AtomicU64,
    /// Calls that hit their deadline
    pub calls_timed_out: AtomicU64,
    /// Calls rejected because the bridge shut down
    pub calls_cancelled: AtomicU64,
    /// Responses whose request id was unknown or already settled
    pub unroutable_responses: AtomicU64,
    /// Events fanned out (one per inbound event, not per subscriber)
    pub events_dispatched: AtomicU64,
    /// Subscriber callbacks that returned an error or panicked
    pub subscriber_faults: AtomicU64,
    /// Inbound messages that were not bridge traffic
    pub messages_ignored: AtomicU64,
    /// Messages handed to the transport by drains
    pub outbox_drained: AtomicU64,
}

impl BridgeMetrics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Calls issued but not yet settled, as seen by the counters.
    pub fn in_flight(&self) -> u64 {
        let s = self.snapshot();
        s.calls_issued.saturating_sub(
            s.calls_resolved + s.calls_rejected + s.calls_timed_out + s.calls_cancelled,
        )
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls_issued: self.calls_issued.load(Ordering::Relaxed),
            calls_resolved: self.calls_resolved.load(Ordering::Relaxed),
            calls_rejected: self.calls_rejected.load(Ordering::Relaxed),
            calls_timed_out: self.calls_timed_out.load(Ordering::Relaxed),
            calls_cancelled: self.calls_cancelled.load(Ordering::Relaxed),
            unroutable_responses: self.unroutable_responses.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            subscriber_faults: self.subscriber_faults.load(Ordering::Relaxed),
            messages_ignored: self.messages_ignored.load(Ordering::Relaxed),
            outbox_drained: self.outbox_drained.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`BridgeMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub calls_issued: u64,
    pub calls_resolved: u64,
    pub calls_rejected: u64,
    pub calls_timed_out: u64,
    pub calls_cancelled: u64,
    pub unroutable_responses: u64,
    pub events_dispatched: u64,
    pub subscriber_faults: u64,
    pub messages_ignored: u64,
    pub outbox_drained: u64,
}

impl MetricsSnapshot {
    /// Fraction of settled calls that timed out.
    pub fn timeout_rate(&self) -> f64 {
        let settled =
            self.calls_resolved + self.calls_rejected + self.calls_timed_out + self.calls_cancelled;
        if settled > 0 {
            self.calls_timed_out as f64 / settled as f64
        } else {
            0.0
        }
    }
}
