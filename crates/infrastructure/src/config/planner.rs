//! Planner configuration: travel mode, trip estimate inputs, search tuning.

use std::time::Duration;

use domain::{DomainError, FuelSettings, PEAK_HOUR_FACTOR, TravelMode};
use serde::{Deserialize, Serialize};

// ==============================
// Planner Configuration
// ==============================

/// Defaults applied to a fresh route planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Travel mode used when none is given
    #[serde(default)]
    pub default_mode: TravelMode,

    /// Fuel consumption in litres per 100 km
    #[serde(default = "default_fuel_consumption")]
    pub fuel_consumption_l_per_100km: f64,

    /// Fuel price per litre
    #[serde(default = "default_fuel_price")]
    pub fuel_price_per_litre: f64,

    /// Multiplier applied to driving time during rush hour
    #[serde(default = "default_peak_hour_factor")]
    pub peak_hour_factor: f64,

    /// Pause after the last keystroke before a search is sent
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Shortest query that triggers a search
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// How long to wait for a route computation to report back
    #[serde(default = "default_route_timeout_secs")]
    pub route_timeout_secs: u64,
}

const fn default_fuel_consumption() -> f64 {
    8.5
}

const fn default_fuel_price() -> f64 {
    2.5
}

const fn default_peak_hour_factor() -> f64 {
    PEAK_HOUR_FACTOR
}

const fn default_search_debounce_ms() -> u64 {
    350
}

const fn default_min_query_chars() -> usize {
    2
}

const fn default_route_timeout_secs() -> u64 {
    35
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_mode: TravelMode::default(),
            fuel_consumption_l_per_100km: default_fuel_consumption(),
            fuel_price_per_litre: default_fuel_price(),
            peak_hour_factor: default_peak_hour_factor(),
            search_debounce_ms: default_search_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            route_timeout_secs: default_route_timeout_secs(),
        }
    }
}

impl PlannerConfig {
    /// Fuel settings built from the configured figures
    pub fn fuel_settings(&self) -> Result<FuelSettings, DomainError> {
        FuelSettings::new(self.fuel_consumption_l_per_100km, self.fuel_price_per_litre)
    }

    /// Search debounce as a duration
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Route timeout as a duration
    #[must_use]
    pub const fn route_timeout(&self) -> Duration {
        Duration::from_secs(self.route_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.fuel_settings().map_err(|e| e.to_string())?;

        if !self.peak_hour_factor.is_finite() || self.peak_hour_factor < 1.0 {
            return Err(format!(
                "peak_hour_factor must be a number >= 1.0, got {}",
                self.peak_hour_factor
            ));
        }
        if self.min_query_chars == 0 {
            return Err("min_query_chars must be at least 1".to_string());
        }
        if self.route_timeout_secs == 0 {
            return Err("route_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
