//! Geocoding integration for the route planner
//!
//! Provides free-text address search and reverse lookup via
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! [`GeocodingClient`] defines the interface, implemented by
//! [`NominatimGeocodingClient`]. The client enforces Nominatim's usage policy
//! (at most one request per second) and caches search results.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingClient, NominatimConfig, NominatimGeocodingClient};
//!
//! let client = NominatimGeocodingClient::new(&NominatimConfig::default())?;
//! let places = client.search("Parque Cevallos, Ambato").await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GeocodingClient, NominatimGeocodingClient};
pub use config::NominatimConfig;
pub use error::GeocodingError;
