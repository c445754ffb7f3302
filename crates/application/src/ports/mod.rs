//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod map_surface_port;
mod routing_engine_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use map_surface_port::MockMapSurface;
pub use map_surface_port::{LineStyle, MapSurface, Marker, MarkerKind, OverlayId, RouteLine};
pub use routing_engine_port::{
    EngineError, EngineLeg, EngineOptions, EngineRoute, EngineSummary, ListenerId, RouteEvent,
    RouteEventKind, RouteListener, RoutingEngine, RoutingEngineFactory,
};
