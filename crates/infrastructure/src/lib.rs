//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: geocoding over
//! Nominatim, routing engines over OSRM and an in-memory map surface.
//! Also owns configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, NominatimConfig, OsrmConfig, PlannerConfig, TelemetryAppConfig};
pub use telemetry::{TelemetryError, filter_for_verbosity, init_tracing};
