//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `ts_03_block_rewards=debug`
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tessera".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TS_SERVICE_NAME`: Service name (default: tessera)
    /// - `TS_LOG_LEVEL`: Log level (default: info); `RUST_LOG` overrides it
    ///   at subscriber setup
    /// - `TS_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("TS_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("TS_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: lookup("TS_JSON_LOGS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.json_logs),
        }
    }

    /// Create config for testing: debug level, plain output.
    pub fn for_testing() -> Self {
        Self {
            service_name: "tessera-test".to_string(),
            log_level: "debug".to_string(),
            json_logs: false,
        }
    }
}
