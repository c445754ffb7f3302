//! Routing integration for the route planner
//!
//! Computes driving, walking and cycling routes through the
//! [OSRM](https://project-osrm.org) `route/v1` HTTP API.
//!
//! # Architecture
//!
//! - [`RoutingClient`]: async trait for route computation
//! - [`OsrmRoutingClient`]: HTTP implementation
//! - [`models`]: OSRM response types, geometry decoding
//! - [`instructions`]: turn-by-turn text for OSRM maneuvers
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let routes = client.route("bicycle", &[origin, destination]).await?;
//! ```

mod client;
mod config;
mod error;
pub mod instructions;
pub mod models;

pub use client::{OsrmRoutingClient, RoutingClient};
pub use config::OsrmConfig;
pub use error::RoutingError;
pub use models::{OsrmLeg, OsrmManeuver, OsrmRoute, OsrmRoutes, OsrmStep};
