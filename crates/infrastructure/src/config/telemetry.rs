//! Telemetry configuration: log filter and output format.

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// Log level filter (e.g., "warn", "route_planner=debug,integration_routing=info")
    ///
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}

impl TelemetryAppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.log_filter.trim().is_empty() {
            return Err("log_filter must not be empty".to_string());
        }
        Ok(())
    }
}
