//! # Rapport Telemetry
//!
//! Subscriber setup for processes embedding `rapport`. The library crate only
//! emits `tracing` events; binaries and test harnesses call [`init_tracing`]
//! once at startup to decide where those events go.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rapport_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     init_tracing(&TelemetryConfig::from_env()).expect("Failed to init tracing");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RAPPORT_SERVICE_NAME` | `rapport` | Service name attached to the startup event |
//! | `RAPPORT_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `RAPPORT_CONSOLE_OUTPUT` | `true` | Write events to stdout |
//! | `RAPPORT_JSON_LOGS` | `false` | JSON instead of human-readable lines |

#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {filter:?}: {message}")]
    Filter { filter: String, message: String },

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}
