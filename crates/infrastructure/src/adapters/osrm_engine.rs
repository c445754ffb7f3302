//! OSRM routing engine - Implements RoutingEngine using integration_routing
//!
//! Each engine owns its waypoints, its listeners and a generation counter.
//! A computation runs as a task on the tokio runtime; when it completes the
//! engine draws the routes on its surface and emits `RoutesFound` followed by
//! `RouteSelected`, or `RoutingError` on failure. Responses of computations
//! superseded by a newer `route()` call, or arriving after the engine left
//! the surface, are discarded.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use application::{
    ApplicationError,
    ports::{
        EngineError, EngineLeg, EngineOptions, EngineRoute, EngineSummary, ListenerId, MapSurface,
        OverlayId, RouteEvent, RouteEventKind, RouteLine, RouteListener, RoutingEngine,
        RoutingEngineFactory,
    },
    services::ListenerRegistry,
};
use domain::{GeoPoint, TravelMode};
use integration_routing::{
    OsrmConfig, OsrmRoute, OsrmRoutes, OsrmRoutingClient, RoutingClient, RoutingError,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// Convert one OSRM route into the engine's route shape
fn to_engine_route(route: &OsrmRoute, raw: serde_json::Value) -> EngineRoute {
    let coordinates = route.decode_geometry().unwrap_or_else(|e| {
        warn!(error = %e, "Route geometry could not be decoded");
        Vec::new()
    });

    let summary = (route.distance.is_some() || route.duration.is_some()).then_some(EngineSummary {
        total_distance: route.distance,
        total_time: route.duration,
    });

    let legs = (!route.legs.is_empty()).then(|| {
        route
            .legs
            .iter()
            .map(|leg| EngineLeg {
                distance: leg.distance,
                duration: leg.duration,
            })
            .collect()
    });

    let name = route
        .legs
        .iter()
        .map(|leg| leg.summary.as_str())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    EngineRoute {
        name,
        summary,
        distance: None,
        duration: None,
        legs,
        instructions: route.instructions(),
        coordinates,
        raw,
    }
}

/// Convert a client failure into an event payload
fn to_engine_error(err: &RoutingError) -> EngineError {
    match err {
        RoutingError::Service { code, message } => EngineError::with_status(code, message),
        RoutingError::RateLimitExceeded => {
            EngineError::with_status("TooManyRequests", err.to_string())
        },
        RoutingError::Timeout { .. } => EngineError::with_status("Timeout", err.to_string()),
        _ => EngineError::new(err.to_string()),
    }
}

struct EngineState {
    id: OverlayId,
    options: EngineOptions,
    client: Arc<dyn RoutingClient>,
    listeners: ListenerRegistry,
    surface: Mutex<Option<Arc<dyn MapSurface>>>,
    waypoints: Mutex<Vec<GeoPoint>>,
    generation: AtomicU64,
}

impl EngineState {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn attached_surface(&self) -> Option<Arc<dyn MapSurface>> {
        self.surface
            .lock()
            .as_ref()
            .filter(|s| !s.is_disposed() && s.has_overlay(self.id))
            .cloned()
    }

    fn complete(&self, generation: u64, result: Result<OsrmRoutes, RoutingError>) {
        if !self.is_current(generation) {
            debug!(overlay = self.id.value(), generation, "Discarding superseded route response");
            return;
        }
        let Some(surface) = self.attached_surface() else {
            debug!(overlay = self.id.value(), "Discarding route response for a detached engine");
            return;
        };

        match result {
            Ok(found) => self.routes_found(surface.as_ref(), found),
            Err(e) => {
                error!(overlay = self.id.value(), error = %e, "Route computation failed");
                let event = RouteEvent::RoutingError(to_engine_error(&e));
                self.listeners.emit(&event);
            },
        }
    }

    fn routes_found(&self, surface: &dyn MapSurface, found: OsrmRoutes) {
        let routes: Vec<EngineRoute> = found
            .routes
            .iter()
            .zip(found.raw)
            .map(|(route, raw)| to_engine_route(route, raw))
            .collect();

        let Some(best) = routes.first().cloned() else {
            self.listeners.emit(&RouteEvent::RoutingError(EngineError::with_status(
                "NoRoute",
                "No route found between the waypoints",
            )));
            return;
        };

        self.draw(surface, &routes);

        info!(
            overlay = self.id.value(),
            routes = routes.len(),
            profile = self.options.profile(),
            "Routes found"
        );
        self.listeners.emit(&RouteEvent::RoutesFound { routes });
        self.listeners.emit(&RouteEvent::RouteSelected { route: best });
    }

    fn draw(&self, surface: &dyn MapSurface, routes: &[EngineRoute]) {
        let mut lines = Vec::with_capacity(routes.len());
        if self.options.show_alternatives {
            lines.extend(routes.iter().skip(1).map(|route| RouteLine {
                coordinates: route.coordinates.clone(),
                style: self.options.alternate_style.clone(),
            }));
        }
        if let Some(best) = routes.first() {
            lines.push(RouteLine {
                coordinates: best.coordinates.clone(),
                style: self.options.primary_style.clone(),
            });
            if self.options.fit_selected_routes && !best.coordinates.is_empty() {
                surface.fit_bounds(&best.coordinates);
            }
        }
        surface.draw_routes(self.id, lines);
    }
}

/// Routing engine backed by an OSRM route service
pub struct OsrmRoutingEngine {
    state: Arc<EngineState>,
    runtime: Handle,
}

impl std::fmt::Debug for OsrmRoutingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmRoutingEngine")
            .field("id", &self.state.id)
            .field("mode", &self.state.options.mode)
            .field("generation", &self.state.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl OsrmRoutingEngine {
    /// Create a detached engine
    pub fn new(options: EngineOptions, client: Arc<dyn RoutingClient>, runtime: Handle) -> Self {
        Self {
            state: Arc::new(EngineState {
                id: OverlayId::next(),
                options,
                client,
                listeners: ListenerRegistry::new(),
                surface: Mutex::new(None),
                waypoints: Mutex::new(Vec::new()),
                generation: AtomicU64::new(0),
            }),
            runtime,
        }
    }

    /// Construction options
    pub fn options(&self) -> &EngineOptions {
        &self.state.options
    }
}

impl RoutingEngine for OsrmRoutingEngine {
    fn overlay_id(&self) -> OverlayId {
        self.state.id
    }

    fn mode(&self) -> TravelMode {
        self.state.options.mode
    }

    fn set_waypoints(&self, points: Vec<GeoPoint>) {
        *self.state.waypoints.lock() = points;
    }

    fn waypoints(&self) -> Vec<GeoPoint> {
        self.state.waypoints.lock().clone()
    }

    fn route(&self) -> Result<(), ApplicationError> {
        let points = self.waypoints();
        if points.len() < 2 {
            return Err(ApplicationError::Engine(format!(
                "at least two waypoints are required, got {}",
                points.len()
            )));
        }

        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let profile = self.state.options.mode.service_profile();
        debug!(
            overlay = self.state.id.value(),
            generation,
            profile,
            points = points.len(),
            "Starting route computation"
        );

        let state = Arc::clone(&self.state);
        self.runtime.spawn(async move {
            let result = state.client.route(profile, &points).await;
            state.complete(generation, result);
        });
        Ok(())
    }

    fn on(&self, kind: RouteEventKind, listener: RouteListener) -> ListenerId {
        self.state.listeners.add(kind, listener)
    }

    fn off(&self, kind: RouteEventKind, id: ListenerId) -> bool {
        self.state.listeners.remove(kind, id)
    }

    fn listener_count(&self, kind: RouteEventKind) -> usize {
        self.state.listeners.count(kind)
    }

    fn add_to(&self, surface: Arc<dyn MapSurface>) -> Result<(), ApplicationError> {
        surface.attach_overlay(self.state.id)?;
        if let Some(previous) = self.state.surface.lock().replace(surface) {
            previous.detach_overlay(self.state.id);
        }
        Ok(())
    }

    fn remove(&self) {
        // In-flight computations must not draw on a surface we left.
        self.state.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(surface) = self.state.surface.lock().take() {
            surface.detach_overlay(self.state.id);
        }
    }

    fn is_attached(&self) -> bool {
        self.state.attached_surface().is_some()
    }
}

impl Drop for OsrmRoutingEngine {
    fn drop(&mut self) {
        self.state.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Builds [`OsrmRoutingEngine`]s sharing one route client
#[derive(Clone)]
pub struct OsrmEngineFactory {
    client: Arc<dyn RoutingClient>,
    runtime: Handle,
}

impl std::fmt::Debug for OsrmEngineFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmEngineFactory")
            .field("client", &"dyn RoutingClient")
            .finish_non_exhaustive()
    }
}

impl OsrmEngineFactory {
    /// Create a factory spawning computations on `runtime`
    pub fn new(client: Arc<dyn RoutingClient>, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    /// Create a factory on the current tokio runtime
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn from_current(client: Arc<dyn RoutingClient>) -> Result<Self, ApplicationError> {
        let runtime = Handle::try_current()
            .map_err(|e| ApplicationError::Internal(format!("no tokio runtime: {e}")))?;
        Ok(Self::new(client, runtime))
    }

    /// Create a factory over an OSRM HTTP client on the current runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize or no tokio
    /// runtime is running.
    pub fn osrm(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client = OsrmRoutingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Self::from_current(Arc::new(client))
    }
}

impl RoutingEngineFactory for OsrmEngineFactory {
    fn create(&self, options: EngineOptions) -> Result<Box<dyn RoutingEngine>, ApplicationError> {
        debug!(profile = options.profile(), "Building OSRM routing engine");
        Ok(Box::new(OsrmRoutingEngine::new(
            options,
            Arc::clone(&self.client),
            self.runtime.clone(),
        )))
    }
}
