//! Nominatim client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Maximum number of search suggestions
    #[serde(default = "default_result_limit")]
    pub result_limit: u8,

    /// Detail level for reverse lookups (18 = building)
    #[serde(default = "default_reverse_zoom")]
    pub reverse_zoom: u8,

    /// Preferred response language (empty for the service default)
    #[serde(default)]
    pub accept_language: String,

    /// Country code filter (e.g., "ec"; empty for worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// User agent sent with every request, as required by the usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

const fn default_result_limit() -> u8 {
    8
}

const fn default_reverse_zoom() -> u8 {
    18
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

fn default_user_agent() -> String {
    concat!("route-planner/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            result_limit: default_result_limit(),
            reverse_zoom: default_reverse_zoom(),
            accept_language: String::new(),
            country_filter: String::new(),
            min_request_interval_ms: default_min_request_interval_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_hours: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_hours > 0
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

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.result_limit == 0 || self.result_limit > 50 {
            return Err("result_limit must be between 1 and 50".to_string());
        }

        if self.reverse_zoom > 18 {
            return Err("reverse_zoom must be 18 or less".to_string());
        }

        Ok(())
    }
}
