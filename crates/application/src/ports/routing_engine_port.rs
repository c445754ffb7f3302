//! Routing engine port
//!
//! A routing engine is a stateful, event-emitting turn-by-turn router bound
//! to a map surface. Its travel profile is fixed at construction; a different
//! mode needs a new engine from a [`RoutingEngineFactory`].

use std::{fmt, sync::Arc};

use domain::{GeoPoint, RouteStep, TravelMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::map_surface_port::{LineStyle, MapSurface, OverlayId};
use crate::error::ApplicationError;

/// Events a routing engine emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteEventKind {
    /// Computation finished with one or more routes
    RoutesFound,
    /// A route was selected (the best one after each computation)
    RouteSelected,
    /// Computation failed
    RoutingError,
}

impl RouteEventKind {
    /// All event kinds, in binding order
    pub const ALL: [Self; 3] = [Self::RoutesFound, Self::RouteSelected, Self::RoutingError];

    /// Event name as used in logs
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::RoutesFound => "routesfound",
            Self::RouteSelected => "routeselected",
            Self::RoutingError => "routingerror",
        }
    }
}

impl fmt::Display for RouteEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Precomputed totals some engines attach to a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSummary {
    /// Total distance in meters
    pub total_distance: Option<f64>,
    /// Total time in seconds
    pub total_time: Option<f64>,
}

/// Per-leg figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineLeg {
    /// Leg distance in meters
    pub distance: Option<f64>,
    /// Leg duration in seconds
    pub duration: Option<f64>,
}

/// A route as reported by the engine
///
/// Engines differ in which figures they fill in: a precomputed summary,
/// route-level totals, per-leg figures, or any mix of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineRoute {
    /// Route name (main roads)
    pub name: String,
    /// Precomputed totals
    pub summary: Option<EngineSummary>,
    /// Route-level distance in meters
    pub distance: Option<f64>,
    /// Route-level duration in seconds
    pub duration: Option<f64>,
    /// Per-leg figures
    pub legs: Option<Vec<EngineLeg>>,
    /// Turn-by-turn instructions
    pub instructions: Vec<RouteStep>,
    /// Route geometry
    pub coordinates: Vec<GeoPoint>,
    /// Untouched engine payload
    pub raw: serde_json::Value,
}

/// Payload of a routing error event
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct EngineError {
    /// Service status code, when the service answered
    pub status: Option<String>,
    /// Human-readable reason
    pub message: String,
}

impl EngineError {
    /// Create an error with a message only
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Create an error carrying a service status code
    #[must_use]
    pub fn with_status(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            message: message.into(),
        }
    }
}

/// An event delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEvent {
    /// Routes found, best first
    RoutesFound {
        /// Candidate routes
        routes: Vec<EngineRoute>,
    },
    /// The route now shown as primary
    RouteSelected {
        /// Selected route
        route: EngineRoute,
    },
    /// The computation failed
    RoutingError(EngineError),
}

impl RouteEvent {
    /// Kind of this event
    #[must_use]
    pub const fn kind(&self) -> RouteEventKind {
        match self {
            Self::RoutesFound { .. } => RouteEventKind::RoutesFound,
            Self::RouteSelected { .. } => RouteEventKind::RouteSelected,
            Self::RoutingError(_) => RouteEventKind::RoutingError,
        }
    }
}

/// Identity of a bound listener, used to detach it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Create from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Event listener
pub type RouteListener = Arc<dyn Fn(&RouteEvent) + Send + Sync>;

/// Construction options of a routing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Travel mode the engine routes for
    pub mode: TravelMode,
    /// Style of the selected route
    pub primary_style: LineStyle,
    /// Style of alternative routes
    pub alternate_style: LineStyle,
    /// Draw alternatives next to the selected route
    pub show_alternatives: bool,
    /// Fit the viewport to the selected route
    pub fit_selected_routes: bool,
    /// Recompute whenever waypoints change
    pub auto_route: bool,
    /// Let the user drag waypoints on the map
    pub draggable_waypoints: bool,
}

impl EngineOptions {
    /// Default options for a travel mode
    #[must_use]
    pub fn for_mode(mode: TravelMode) -> Self {
        Self {
            mode,
            primary_style: LineStyle::primary(),
            alternate_style: LineStyle::alternate(),
            show_alternatives: true,
            fit_selected_routes: true,
            auto_route: false,
            draggable_waypoints: false,
        }
    }

    /// Engine profile name (`driving`, `walking`, `cycling`)
    #[must_use]
    pub const fn profile(&self) -> &'static str {
        self.mode.as_str()
    }
}

/// A stateful routing engine instance
pub trait RoutingEngine: Send + Sync + fmt::Debug {
    /// Overlay identity used on the map surface
    fn overlay_id(&self) -> OverlayId;

    /// Mode the engine was built for
    fn mode(&self) -> TravelMode;

    /// Replace the ordered point list
    fn set_waypoints(&self, points: Vec<GeoPoint>);

    /// Current point list
    fn waypoints(&self) -> Vec<GeoPoint>;

    /// Start a computation for the current points
    ///
    /// Results and failures arrive as events; `Err` means the computation
    /// could not be started at all.
    fn route(&self) -> Result<(), ApplicationError>;

    /// Bind a listener
    fn on(&self, kind: RouteEventKind, listener: RouteListener) -> ListenerId;

    /// Unbind a listener; false if it was not bound
    fn off(&self, kind: RouteEventKind, id: ListenerId) -> bool;

    /// Number of listeners bound for an event
    fn listener_count(&self, kind: RouteEventKind) -> usize;

    /// Attach to a map surface
    fn add_to(&self, surface: Arc<dyn MapSurface>) -> Result<(), ApplicationError>;

    /// Detach from the map surface, if attached
    fn remove(&self);

    /// Whether the engine is attached to a live surface
    fn is_attached(&self) -> bool;
}

/// Builds routing engines
pub trait RoutingEngineFactory: Send + Sync + fmt::Debug {
    /// Construct a detached engine
    fn create(&self, options: EngineOptions) -> Result<Box<dyn RoutingEngine>, ApplicationError>;
}
