//! # Integration Flows
//!
//! - `calls`: facade → proxy → correlator → outbox → host → demultiplexer
//! - `events`: host emits → demultiplexer → event hub → subscribers
//! - `install`: namespace install guard and readiness
//! - `wire`: raw channel text, foreign traffic, drain contract
//! - `telemetry`: bridge counters mirrored into Prometheus

pub mod events;
pub mod telemetry;
pub mod wire;
