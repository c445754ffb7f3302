//! Application configuration
//!
//! Split into sections:
//! - `geocoding`: Nominatim search and reverse lookup
//! - `routing`: OSRM route service
//! - `planner`: default mode, trip estimate inputs, search tuning
//! - `telemetry`: log filter and output format
//!
//! Values are read from an optional `config.toml` and overridden by
//! `ROUTE_PLANNER_<SECTION>__<KEY>` environment variables
//! (e.g. `ROUTE_PLANNER_PLANNER__DEFAULT_MODE=cycling`).

mod planner;
mod telemetry;

use std::path::Path;

use application::ApplicationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use integration_geocoding::NominatimConfig;
pub use integration_routing::OsrmConfig;
pub use planner::PlannerConfig;
pub use telemetry::TelemetryAppConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "ROUTE_PLANNER";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Routing service configuration
    #[serde(default)]
    pub routing: OsrmConfig,

    /// Planner defaults
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(None, Self::environment())
    }

    /// Load configuration from an explicit file, still honouring the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(Some(path), Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(path: Option<&Path>, env: config::Environment) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;
        let loaded: Self = config.try_deserialize()?;

        debug!(
            geocoding = %loaded.geocoding.base_url,
            routing = %loaded.routing.base_url,
            mode = %loaded.planner.default_mode,
            "Configuration loaded"
        );
        Ok(loaded)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let sections = [
            ("geocoding", self.geocoding.validate()),
            ("routing", self.routing.validate()),
            ("planner", self.planner.validate()),
            ("telemetry", self.telemetry.validate()),
        ];

        for (section, result) in sections {
            if let Err(reason) = result {
                return Err(ApplicationError::Configuration(format!("{section}: {reason}")));
            }
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Internal(e.to_string()))
    }
}
