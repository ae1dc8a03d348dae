//! Event Hub - named subscriber lists and fan-out.
//!
//! Subscribers are kept per event name in registration order. The same
//! listener may be registered more than once and is then invoked once per
//! registration.

use crate::metrics::BridgeMetrics;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// What a subscriber callback reports back.
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Callback = dyn Fn(&Value) -> ListenerResult + Send + Sync;

/// Handle to a subscriber callback.
///
/// Clones share identity: unsubscribing with any clone removes the
/// registration made with the original. Two handles built from separate
/// closures are never equal, even if the closures are identical.
#[derive(Clone)]
pub struct Listener {
    callback: Arc<Callback>,
}

impl Listener {
    /// Wrap a callback that may fail.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Value) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Wrap a callback that cannot fail.
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        Self::new(move |data| {
            callback(data);
            Ok(())
        })
    }

    /// Same registration identity
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }

    fn invoke(&self, data: &Value) -> ListenerResult {
        (self.callback)(data)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("callback", &Arc::as_ptr(&self.callback))
            .finish()
    }
}

/// Result of fanning one event out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOut {
    /// Subscribers invoked
    pub delivered: usize,
    /// Subscribers that returned an error or panicked
    pub faults: usize,
}

/// Registry of subscribers by event name.
#[derive(Default)]
pub struct EventHub {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    metrics: Arc<BridgeMetrics>,
}

impl EventHub {
    pub fn new(metrics: Arc<BridgeMetrics>) -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// Append a subscriber to `event_name`'s list.
    pub fn subscribe(&self, event_name: &str, listener: Listener) {
        let mut listeners = self.listeners.write();
        let list = listeners.entry(event_name.to_string()).or_default();
        list.push(listener);
        debug!(
            event_name = event_name,
            subscribers = list.len(),
            "Subscribed"
        );
    }

    /// Remove the first registration of `listener` under `event_name`.
    ///
    /// Returns false if it was not registered. Other events are untouched.
    pub fn unsubscribe(&self, event_name: &str, listener: &Listener) -> bool {
        let mut listeners = self.listeners.write();
        let Some(list) = listeners.get_mut(event_name) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l.ptr_eq(listener)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            listeners.remove(event_name);
        }
        true
    }

    /// Drop every subscriber of `event_name`. Returns how many were removed.
    pub fn unsubscribe_all(&self, event_name: &str) -> usize {
        self.listeners
            .write()
            .remove(event_name)
            .map_or(0, |list| list.len())
    }

    /// Number of registrations under `event_name`
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners.read().get(event_name).map_or(0, Vec::len)
    }

    /// Event names with at least one subscriber, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.listeners.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke every subscriber of `event_name` with `data`, in registration order.
    ///
    /// The list is snapshotted before invocation: callbacks may subscribe or
    /// unsubscribe freely, and such changes apply from the next dispatch. A
    /// failing or panicking callback is logged and skipped.
    pub fn dispatch(&self, event_name: &str, data: &Value) -> FanOut {
        let snapshot = match self.listeners.read().get(event_name) {
            Some(list) => list.clone(),
            None => Vec::new(),
        };
        BridgeMetrics::incr(&self.metrics.events_dispatched);

        let mut fan_out = FanOut::default();
        for (index, listener) in snapshot.iter().enumerate() {
            fan_out.delivered += 1;
            let fault = match panic::catch_unwind(AssertUnwindSafe(|| listener.invoke(data))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };

            fan_out.faults += 1;
            BridgeMetrics::incr(&self.metrics.subscriber_faults);
            error!(
                event_name = event_name,
                subscriber = index,
                error = %fault,
                "Event subscriber failed"
            );
        }

        debug!(
            event_name = event_name,
            delivered = fan_out.delivered,
            faults = fan_out.faults,
            "Dispatched event"
        );
        fan_out
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
