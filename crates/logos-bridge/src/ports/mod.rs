//! Ports for the Logos bridge.
//!
//! - [`RemoteModule`]: outbound, what page code calls into
//! - [`HostChannel`]: inbound, what a host transport drives

use crate::domain::messages::OutboundMessage;
use crate::domain::pending::PendingReply;
use crate::handler::Dispatch;
use serde_json::Value;

/// A host module reachable through the bridge.
pub trait RemoteModule: Send + Sync {
    /// Module name as the host knows it
    fn name(&self) -> &str;

    /// Call `method` with positional arguments.
    fn invoke(&self, method: &str, args: Vec<Value>) -> PendingReply;
}

/// The side of the bridge a host transport talks to.
///
/// The transport pulls queued requests with `drain()` and pushes each
/// inbound message through `deliver()`.
pub trait HostChannel: Send + Sync {
    /// Take all queued outbound messages, in order.
    fn drain(&self) -> Vec<OutboundMessage>;

    /// Route one inbound message. Never fails; see [`Dispatch`].
    fn deliver(&self, message: &Value) -> Dispatch;
}
