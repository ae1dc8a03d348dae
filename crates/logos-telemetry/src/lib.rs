//! # Logos Telemetry
//!
//! Logging and metrics for processes hosting a Logos bridge.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an `EnvFilter`, pretty or JSON output
//! - **Metrics**: Prometheus counters mirroring the bridge's own counters,
//!   plus host-side module call and pump timing metrics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use logos_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! // ...
//! logos_telemetry::record_snapshot(&bridge.metrics());
//! let scrape = logos_telemetry::gather_text()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `logos-host` | Service name in logs |
//! | `LOGOS_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `LOGOS_JSON_LOGS` | `false` | JSON log lines |
//! | `LOGOS_CONSOLE_OUTPUT` | `true` | Write logs to the console |

#![allow(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use metrics::{
    gather_text, record_snapshot, register_metrics, HistogramTimer, MetricsHandle, BRIDGE_CALLS,
    HOST_MODULE_CALLS, HOST_PUMP_DURATION,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first (synchronous, no global subscriber needed)
    let metrics_handle = register_metrics()?;

    init_tracing(&config)?;

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Start timing a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
