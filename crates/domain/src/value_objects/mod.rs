//! Value Objects - Immutable, identity-less domain primitives

mod fuel_settings;
mod geo_point;
mod stop_id;
mod travel_mode;

pub use fuel_settings::FuelSettings;
pub use geo_point::GeoPoint;
pub use stop_id::StopId;
pub use travel_mode::TravelMode;
