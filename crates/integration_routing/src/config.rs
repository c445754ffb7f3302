//! OSRM client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL of the route service, up to and including `route/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ask for alternative routes
    #[serde(default = "default_true")]
    pub alternatives: bool,

    /// Ask for turn-by-turn steps
    #[serde(default = "default_true")]
    pub steps: bool,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://router.project-osrm.org/route/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("route-planner/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            alternatives: true,
            steps: true,
            user_agent: default_user_agent(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("base_url must be an http(s) URL".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
