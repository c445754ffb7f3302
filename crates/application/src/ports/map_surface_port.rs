//! Map surface port
//!
//! The surface renders markers and route lines. Routing engines attach
//! themselves as overlays; marker rendering shares the same surface.

use std::sync::atomic::{AtomicU64, Ordering};

use domain::GeoPoint;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Identity of an overlay attached to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocate a process-unique overlay id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Stroke style of a route line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// CSS hex color
    pub color: String,
    /// Stroke width in pixels
    pub weight: u8,
    /// Stroke opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Dash pattern, e.g. `"6,6"`; solid when absent
    pub dash_array: Option<String>,
}

impl LineStyle {
    /// Solid blue line for the selected route
    #[must_use]
    pub fn primary() -> Self {
        Self {
            color: "#2563eb".to_string(),
            weight: 5,
            opacity: 0.9,
            dash_array: None,
        }
    }

    /// Dashed slate line for alternative routes
    #[must_use]
    pub fn alternate() -> Self {
        Self {
            color: "#94a3b8".to_string(),
            weight: 4,
            opacity: 0.7,
            dash_array: Some("6,6".to_string()),
        }
    }
}

/// A styled polyline
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    /// Points of the line
    pub coordinates: Vec<GeoPoint>,
    /// How to draw it
    pub style: LineStyle,
}

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Start of the route
    Origin,
    /// End of the route
    Destination,
    /// Intermediate stop, numbered from 1
    Stop(usize),
}

/// A dot marker with a popup
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Where the marker sits
    pub position: GeoPoint,
    /// Role of the point
    pub kind: MarkerKind,
    /// Popup title ("Origin", "Stop 2", ...)
    pub title: String,
    /// Popup body, usually the place name
    pub label: String,
    /// CSS hex color of the dot
    pub color: &'static str,
}

/// Port for the map surface
#[cfg_attr(test, automock)]
pub trait MapSurface: Send + Sync {
    /// Whether the surface has been torn down
    fn is_disposed(&self) -> bool;

    /// Attach an overlay; fails on a disposed surface
    fn attach_overlay(&self, id: OverlayId) -> Result<(), ApplicationError>;

    /// Detach an overlay and drop its route lines; false if it was not attached
    fn detach_overlay(&self, id: OverlayId) -> bool;

    /// Whether the overlay is currently attached
    fn has_overlay(&self, id: OverlayId) -> bool;

    /// Number of attached overlays
    fn overlay_count(&self) -> usize;

    /// Replace the route lines drawn for an overlay
    fn draw_routes(&self, id: OverlayId, lines: Vec<RouteLine>);

    /// Move the viewport to show all points
    fn fit_bounds(&self, points: &[GeoPoint]);

    /// Replace all markers
    fn set_markers(&self, markers: Vec<Marker>);
}
