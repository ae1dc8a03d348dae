//! Inbound message handling.

pub mod demux;

pub use demux::{Dispatch, InboundDemux};
