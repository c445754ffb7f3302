//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod geocoding_adapter;
mod headless_surface;
mod osrm_engine;

pub use geocoding_adapter::GeocodingAdapter;
pub use headless_surface::{HeadlessMapSurface, Viewport};
pub use osrm_engine::{OsrmEngineFactory, OsrmRoutingEngine};
