//! Application services - Use case implementations

mod listener_registry;
mod marker_layout;
mod route_normalizer;
mod route_planner;
mod routing_overlay;
mod search_debouncer;

pub use listener_registry::ListenerRegistry;
pub use marker_layout::{DESTINATION_COLOR, ORIGIN_COLOR, STOP_COLOR, layout_markers};
pub use route_normalizer::{NormalizeError, derive_totals, normalize};
pub use route_planner::{Endpoint, MapPickTarget, RoutePlanner};
pub use routing_overlay::{
    OverlayInputs, OverlayStatus, ReconcileReport, RouteCallbacks, RoutingOverlayAdapter,
};
pub use search_debouncer::{
    DEFAULT_MIN_QUERY_CHARS, DEFAULT_SEARCH_DEBOUNCE, SearchDebouncer, SearchOutcome,
};
