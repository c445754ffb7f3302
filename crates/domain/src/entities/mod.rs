//! Domain entities - Objects with identity or composite route data

mod place;
mod route;
mod stop;
mod trip_estimate;

pub use place::PlaceCandidate;
pub use route::{RoutePoints, RouteRequest, RouteResult, RouteStep, RouteSummary};
pub use stop::{NamedStop, StopList};
pub use trip_estimate::{PEAK_HOUR_FACTOR, TripEstimate};
