//! Call Correlator - request-id allocation, in-flight table, and deadlines.
//!
//! Flow:
//! 1. `issue_call()` allocates a fresh `RequestId` and registers a pending entry
//! 2. The `logos_request` is appended to the outbox
//! 3. A timer task is armed for the call's deadline
//! 4. The demultiplexer calls `resolve()` when the matching response arrives
//! 5. Whichever of (4) or the timer removes the entry first settles the reply;
//!    the other finds nothing and does nothing

use crate::domain::messages::{OutboundMessage, RequestId};
use crate::domain::outbox::Outbox;
use crate::error::BridgeError;
use crate::metrics::BridgeMetrics;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// What a settled call yields to its caller.
pub type CallOutcome = Result<Value, BridgeError>;

/// A call waiting for its response
struct PendingCall {
    /// Channel that settles the caller's reply
    sender: oneshot::Sender<CallOutcome>,
    /// Target module (for logging and timeout errors)
    module: String,
    /// Target method (for logging and timeout errors)
    method: String,
    /// When the call was issued
    created_at: Instant,
    /// Deadline relative to `created_at`
    timeout: Duration,
    /// Timer task, cancelled when the call settles first
    timer: Option<AbortHandle>,
}

impl PendingCall {
    fn is_overdue(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.timeout
    }
}

/// How a `call-response` was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The call resolved with the response's result
    Resolved,
    /// The call rejected with the response's error string
    Rejected,
    /// No call was waiting on this id (late, duplicate, or unknown)
    Unroutable,
}

/// In-flight call table plus id allocation.
pub struct CallCorrelator {
    /// Map of request id to pending call
    pending: Arc<DashMap<RequestId, PendingCall>>,
    /// Next id to hand out; starts at 1
    next_id: AtomicU64,
    /// Deadline applied when the caller does not pick one
    default_timeout: Duration,
    /// Where call requests are queued
    outbox: Arc<Outbox>,
    /// Shared counters
    metrics: Arc<BridgeMetrics>,
}

impl CallCorrelator {
    /// Create a correlator that queues requests into `outbox`.
    pub fn new(outbox: Arc<Outbox>, default_timeout: Duration, metrics: Arc<BridgeMetrics>) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
            default_timeout,
            outbox,
            metrics,
        }
    }

    /// Issue a call with the default deadline.
    ///
    /// Never blocks: the request is queued and the reply handle returned at once.
    pub fn issue_call(&self, module: &str, method: &str, args: Vec<Value>) -> PendingReply {
        self.issue_call_with_timeout(module, method, args, self.default_timeout)
    }

    /// Issue a call with an explicit deadline.
    pub fn issue_call_with_timeout(
        &self,
        module: &str,
        method: &str,
        args: Vec<Value>,
        timeout: Duration,
    ) -> PendingReply {
        let request_id = RequestId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();

        self.pending.insert(
            request_id,
            PendingCall {
                sender: tx,
                module: module.to_string(),
                method: method.to_string(),
                created_at: Instant::now(),
                timeout,
                timer: None,
            },
        );
        self.outbox
            .append(OutboundMessage::call(request_id, module, method, args));
        BridgeMetrics::incr(&self.metrics.calls_issued);

        self.arm_timer(request_id, timeout);

        debug!(
            request_id = %request_id,
            module = module,
            method = method,
            timeout_ms = timeout.as_millis(),
            "Issued call"
        );

        PendingReply::new(request_id, rx)
    }

    fn arm_timer(&self, request_id: RequestId, timeout: Duration) {
        let Ok(runtime) = Handle::try_current() else {
            debug!(
                request_id = %request_id,
                "No async runtime; call will be reaped by the overdue sweep"
            );
            return;
        };

        let pending = self.pending.clone();
        let metrics = self.metrics.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            expire(&pending, &metrics, request_id);
        });

        // The timer may already have fired, or a response may have raced in.
        if let Some(mut call) = self.pending.get_mut(&request_id) {
            call.timer = Some(task.abort_handle());
        }
    }

    /// Apply a `call-response`.
    ///
    /// An error string (even an empty one) rejects; otherwise `result`
    /// resolves the call, whatever value it holds.
    pub fn resolve(&self, request_id: RequestId, result: Value, error: Option<String>) -> Resolution {
        let Some((_, mut call)) = self.pending.remove(&request_id) else {
            BridgeMetrics::incr(&self.metrics.unroutable_responses);
            warn!(
                request_id = %request_id,
                "Response for unknown or already settled request id"
            );
            return Resolution::Unroutable;
        };

        if let Some(timer) = call.timer.take() {
            timer.abort();
        }

        let (outcome, resolution) = match error {
            Some(message) => {
                BridgeMetrics::incr(&self.metrics.calls_rejected);
                (Err(BridgeError::HostReported(message)), Resolution::Rejected)
            }
            None => {
                BridgeMetrics::incr(&self.metrics.calls_resolved);
                (Ok(result), Resolution::Resolved)
            }
        };

        let response_time = call.created_at.elapsed();
        if call.sender.send(outcome).is_err() {
            debug!(
                request_id = %request_id,
                module = call.module,
                method = call.method,
                "Caller dropped its reply before the response arrived"
            );
        } else {
            debug!(
                request_id = %request_id,
                module = call.module,
                method = call.method,
                outcome = ?resolution,
                response_time_ms = response_time.as_millis(),
                "Settled call"
            );
        }

        resolution
    }

    /// Reject every call whose deadline has passed.
    ///
    /// Timers normally do this; the sweep covers calls issued where no timer
    /// could be armed. Returns the number of calls expired.
    pub fn expire_overdue(&self) -> usize {
        let now = Instant::now();
        let overdue: Vec<RequestId> = self
            .pending
            .iter()
            .filter(|entry| entry.value().is_overdue(now))
            .map(|entry| *entry.key())
            .collect();

        overdue
            .into_iter()
            .filter(|id| expire(&self.pending, &self.metrics, *id))
            .count()
    }

    /// Reject every in-flight call with `BridgeShutdown`.
    ///
    /// Returns the number of calls cancelled.
    pub fn shutdown(&self) -> usize {
        let ids: Vec<RequestId> = self.pending.iter().map(|entry| *entry.key()).collect();
        let mut cancelled = 0;

        for id in ids {
            if let Some((_, mut call)) = self.pending.remove(&id) {
                if let Some(timer) = call.timer.take() {
                    timer.abort();
                }
                let _ = call.sender.send(Err(BridgeError::BridgeShutdown));
                BridgeMetrics::incr(&self.metrics.calls_cancelled);
                cancelled += 1;
            }
        }

        if cancelled > 0 {
            debug!(cancelled = cancelled, "Cancelled in-flight calls on shutdown");
        }
        cancelled
    }

    /// Get number of calls in flight
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if a request id is in flight
    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.pending.contains_key(request_id)
    }

    /// Deadline applied by `issue_call`
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

/// Remove and reject one call if it is still registered.
fn expire(
    pending: &DashMap<RequestId, PendingCall>,
    metrics: &BridgeMetrics,
    request_id: RequestId,
) -> bool {
    let Some((_, call)) = pending.remove(&request_id) else {
        return false;
    };

    warn!(
        request_id = %request_id,
        module = call.module,
        method = call.method,
        timeout_ms = call.timeout.as_millis(),
        "Call timed out"
    );
    BridgeMetrics::incr(&metrics.calls_timed_out);

    let _ = call.sender.send(Err(BridgeError::RequestTimeout {
        request_id,
        module: call.module,
        method: call.method,
        timeout: call.timeout,
    }));
    true
}

/// Background task that reaps overdue calls on a fixed period.
pub async fn sweep_task(correlator: Arc<CallCorrelator>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let expired = correlator.expire_overdue();
        if expired > 0 {
            debug!(expired = expired, "Swept overdue calls");
        }
    }
}

/// Handle to the eventual outcome of a remote call.
///
/// Await it for the host's result. Dropping it abandons interest only; the
/// call stays registered until its response or deadline.
#[derive(Debug)]
pub struct PendingReply {
    request_id: RequestId,
    rx: oneshot::Receiver<CallOutcome>,
}

impl PendingReply {
    fn new(request_id: RequestId, rx: oneshot::Receiver<CallOutcome>) -> Self {
        Self { request_id, rx }
    }

    /// Id carried by the outbound request
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Await the result and deserialize it into `T`.
    pub async fn typed<T: DeserializeOwned>(self) -> Result<T, BridgeError> {
        let value = self.await?;
        serde_json::from_value(value).map_err(|e| BridgeError::Decode(e.to_string()))
    }
}

impl Future for PendingReply {
    type Output = CallOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // Sender dropped without settling: the correlator itself is gone.
            Poll::Ready(Err(_)) => Poll::Ready(Err(BridgeError::BridgeShutdown)),
            Poll::Pending => Poll::Pending,
        }
    }
}
