//! # Logos Host Library
//!
//! Reference host side of the Logos bridge: a module registry, the runtime
//! that pumps calls between the bridge and those modules, and demo modules.
//! The `logos-host` binary wires these together.
//!
//! ```text
//!   Bridge outbox ──drain──▶ HostRuntime ──call──▶ ModuleRegistry ─▶ HostModule
//!        ▲                        │                                     │
//!        └── logos_response ──────┘◀──────── HostContext::emit ─────────┘
//!            logos_event
//! ```

#![allow(missing_docs)]
#![allow(clippy::type_complexity)]

pub mod config;
pub mod module;
pub mod modules;
pub mod registry;
pub mod runtime;

pub use config::{HostConfig, HostConfigError};
pub use module::{HostCallError, HostContext, HostModule};
pub use registry::ModuleRegistry;
pub use runtime::{HostError, HostRuntime, PumpReport};
