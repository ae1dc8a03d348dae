//! Domain types for the Logos bridge.
//!
//! Wire messages, configuration, and the four shared structures every bridge
//! instance owns: outbox, call correlator, event hub, proxy cache.

pub mod config;
pub mod events;
pub mod messages;
pub mod outbox;
pub mod pending;
pub mod proxy;

// Re-exports for convenience
pub use config::{BridgeConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SWEEP_INTERVAL};
pub use events::{EventHub, FanOut, Listener, ListenerResult};
pub use messages::{InboundMessage, OutboundMessage, RequestId, EVENT_TAG, REQUEST_TAG, RESPONSE_TAG};
pub use outbox::Outbox;
pub use pending::{sweep_task, CallCorrelator, CallOutcome, PendingReply, Resolution};
pub use proxy::{MethodHandle, ModuleProxy, PropertyKey, ProxyCache, THENABLE_KEY};
