// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Logos Bridge - call/event correlation between a sandboxed webview and its host.
//!
//! Page code calls host modules by name and awaits the result; the host pushes
//! named events back. The two sides share only a message channel the host
//! polls, so every call is queued, tagged with a request id, and matched to
//! its response when the host delivers it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          LOGOS BRIDGE                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   Facade.on / removeListener          Facade.<module>.<method>   │
//! │            │                                     │               │
//! │   ┌────────┴───────┐                    ┌────────┴────────┐      │
//! │   │   Event Hub    │                    │  Module Proxy   │      │
//! │   └────────▲───────┘                    └────────┬────────┘      │
//! │            │                                     │               │
//! │            │                            ┌────────┴────────┐      │
//! │            │                 resolve    │ Call Correlator │      │
//! │            │            ┌──────────────▶│ (id + deadline) │      │
//! │            │            │               └────────┬────────┘      │
//! │   ┌────────┴────────────┴──┐            ┌────────┴────────┐      │
//! │   │  Inbound Demultiplexer │            │     Outbox      │      │
//! │   └────────────▲───────────┘            └────────┬────────┘      │
//! └────────────────┼─────────────────────────────────┼───────────────┘
//!                  │ logos_response / logos_event    │ drain()
//!                  └──────────── host transport ◀────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use logos_bridge::{BridgeConfig, Namespace};
//! use serde_json::json;
//!
//! Namespace::global().install(BridgeConfig::from_env()?)?;
//! let logos = Namespace::global().wait_ready().await.unwrap();
//!
//! let sum = logos.module("mathPlugin").get("add").unwrap().call(vec![json!(2), json!(3)]);
//! // host drains, executes, and delivers {"type":"logos_response", ...}
//! assert_eq!(sum.await?, json!(5));
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export main types
pub use domain::{
    sweep_task, BridgeConfig, CallCorrelator, CallOutcome, EventHub, FanOut, InboundMessage,
    Listener, ListenerResult, MethodHandle, ModuleProxy, OutboundMessage, Outbox, PendingReply,
    PropertyKey, ProxyCache, RequestId, Resolution, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SWEEP_INTERVAL,
};
pub use error::{BridgeError, ConfigError};
pub use handler::{Dispatch, InboundDemux};
pub use metrics::{BridgeMetrics, MetricsSnapshot};
pub use ports::{HostChannel, RemoteModule};
pub use service::{Bridge, Facade, FacadeProperty, Installation, Namespace, READY_EVENT};
