//! # Tessera Telemetry
//!
//! Structured logging for Tessera binaries and test harnesses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ts_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     init_tracing(&TelemetryConfig::from_env()).expect("Failed to init tracing");
//!     // subsystem events now reach the subscriber
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TS_SERVICE_NAME` | `tessera` | Service name in logs |
//! | `TS_LOG_LEVEL` | `info` | Log level filter |
//! | `TS_JSON_LOGS` | `false` | JSON output |
//! | `RUST_LOG` | unset | Overrides `TS_LOG_LEVEL` |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}
