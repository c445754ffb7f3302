//! Headless map surface - Implements MapSurface without rendering
//!
//! Keeps overlays, route lines, markers and the viewport in memory. Used by
//! the command line front end, where results are printed instead of drawn.

use std::collections::BTreeMap;

use application::{
    ApplicationError,
    ports::{MapSurface, Marker, OverlayId, RouteLine},
};
use domain::GeoPoint;
use parking_lot::Mutex;
use tracing::debug;

/// South-west and north-east corners of the visible area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// South-west corner
    pub south_west: GeoPoint,
    /// North-east corner
    pub north_east: GeoPoint,
}

impl Viewport {
    /// Smallest box containing all points; `None` for no points
    pub fn enclosing(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let (mut south, mut west) = (first.latitude(), first.longitude());
        let (mut north, mut east) = (south, west);

        for p in &points[1..] {
            south = south.min(p.latitude());
            north = north.max(p.latitude());
            west = west.min(p.longitude());
            east = east.max(p.longitude());
        }

        Some(Self {
            south_west: GeoPoint::new_unchecked(south, west),
            north_east: GeoPoint::new_unchecked(north, east),
        })
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    disposed: bool,
    overlays: BTreeMap<OverlayId, Vec<RouteLine>>,
    markers: Vec<Marker>,
    viewport: Option<Viewport>,
}

/// In-memory map surface
#[derive(Debug, Default)]
pub struct HeadlessMapSurface {
    state: Mutex<SurfaceState>,
}

impl HeadlessMapSurface {
    /// Create an empty, live surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear the surface down, dropping every overlay
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        state.disposed = true;
        state.overlays.clear();
        state.markers.clear();
        debug!("Map surface disposed");
    }

    /// Route lines currently drawn for an overlay
    pub fn routes(&self, id: OverlayId) -> Vec<RouteLine> {
        self.state
            .lock()
            .overlays
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Markers currently shown
    pub fn markers(&self) -> Vec<Marker> {
        self.state.lock().markers.clone()
    }

    /// Current viewport, once something was fitted
    pub fn viewport(&self) -> Option<Viewport> {
        self.state.lock().viewport
    }
}

impl MapSurface for HeadlessMapSurface {
    fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    fn attach_overlay(&self, id: OverlayId) -> Result<(), ApplicationError> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(ApplicationError::SurfaceDisposed);
        }
        state.overlays.entry(id).or_default();
        debug!(overlay = id.value(), "Overlay attached");
        Ok(())
    }

    fn detach_overlay(&self, id: OverlayId) -> bool {
        let removed = self.state.lock().overlays.remove(&id).is_some();
        if removed {
            debug!(overlay = id.value(), "Overlay detached");
        }
        removed
    }

    fn has_overlay(&self, id: OverlayId) -> bool {
        self.state.lock().overlays.contains_key(&id)
    }

    fn overlay_count(&self) -> usize {
        self.state.lock().overlays.len()
    }

    fn draw_routes(&self, id: OverlayId, lines: Vec<RouteLine>) {
        let mut state = self.state.lock();
        match state.overlays.get_mut(&id) {
            Some(drawn) => *drawn = lines,
            None => debug!(overlay = id.value(), "Ignoring routes for a detached overlay"),
        }
    }

    fn fit_bounds(&self, points: &[GeoPoint]) {
        let mut state = self.state.lock();
        if state.disposed {
            return;
        }
        if let Some(viewport) = Viewport::enclosing(points) {
            state.viewport = Some(viewport);
        }
    }

    fn set_markers(&self, markers: Vec<Marker>) {
        let mut state = self.state.lock();
        if !state.disposed {
            state.markers = markers;
        }
    }
}
