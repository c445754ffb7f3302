//! Routing overlay adapter
//!
//! Bridges declarative route state (points and travel mode) to a stateful
//! routing engine attached to a map surface. One adapter owns the engine of
//! one surface for the surface's lifetime.
//!
//! Every [`RoutingOverlayAdapter::reconcile`] call runs three phases in
//! order:
//!
//! 1. lifecycle: build the engine lazily, rebuild it when the mode changes
//! 2. listeners: detach the previously bound listeners, bind fresh ones that
//!    see the latest callbacks
//! 3. dispatch: push the point list and start a computation when the points
//!    changed by value

use std::{fmt, sync::Arc};

use domain::{RoutePoints, RouteRequest, RouteResult, RouteSummary, TravelMode};
use tracing::{debug, error, info, warn};

use super::route_normalizer::normalize;
use crate::{
    error::ApplicationError,
    ports::{
        EngineError, EngineOptions, EngineRoute, ListenerId, MapSurface, RouteEvent,
        RouteEventKind, RouteListener, RoutingEngine, RoutingEngineFactory,
    },
};

type FoundCallback = Arc<dyn Fn(&RouteSummary) + Send + Sync>;
type RouteCallback = Arc<dyn Fn(&RouteResult) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&EngineError) + Send + Sync>;

/// Callbacks the adapter reports to
///
/// Each callback defaults to a no-op.
#[derive(Clone)]
pub struct RouteCallbacks {
    on_found: FoundCallback,
    on_route: RouteCallback,
    on_error: ErrorCallback,
}

impl Default for RouteCallbacks {
    fn default() -> Self {
        Self {
            on_found: Arc::new(|_| {}),
            on_route: Arc::new(|_| {}),
            on_error: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for RouteCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCallbacks").finish_non_exhaustive()
    }
}

impl RouteCallbacks {
    /// Callbacks that do nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the normalised summary of each found route
    #[must_use]
    pub fn on_found(mut self, f: impl Fn(&RouteSummary) + Send + Sync + 'static) -> Self {
        self.on_found = Arc::new(f);
        self
    }

    /// Called with the full result of each found route, after `on_found`
    #[must_use]
    pub fn on_route(mut self, f: impl Fn(&RouteResult) + Send + Sync + 'static) -> Self {
        self.on_route = Arc::new(f);
        self
    }

    /// Called when the engine reports a failure
    #[must_use]
    pub fn on_error(mut self, f: impl Fn(&EngineError) + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(f);
        self
    }

    fn deliver(&self, route: &EngineRoute) {
        match normalize(route) {
            Ok(result) => {
                let summary = result.summary();
                debug!(%summary, steps = result.steps.len(), "Route normalised");
                (self.on_found)(&summary);
                (self.on_route)(&result);
            },
            Err(e) => {
                warn!(error = %e, route = %route.raw, "Could not derive a summary from the route");
            },
        }
    }

    fn fail(&self, error: &EngineError) {
        error!(status = ?error.status, error = %error.message, "Routing failed");
        (self.on_error)(error);
    }

    /// Build a listener routing every event kind to these callbacks
    fn listener(&self) -> RouteListener {
        let callbacks = self.clone();
        Arc::new(move |event: &RouteEvent| match event {
            RouteEvent::RoutesFound { routes } => match routes.first() {
                Some(best) => callbacks.deliver(best),
                None => warn!("Routing engine reported an empty route set"),
            },
            RouteEvent::RouteSelected { route } => callbacks.deliver(route),
            RouteEvent::RoutingError(error) => callbacks.fail(error),
        })
    }
}

/// Inputs of one reconciliation
#[derive(Debug, Clone, Default)]
pub struct OverlayInputs {
    /// Route points as currently known
    pub points: RoutePoints,
    /// Travel mode
    pub mode: TravelMode,
    /// Latest callbacks
    pub callbacks: RouteCallbacks,
}

/// What a reconciliation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// An engine was built
    pub created: bool,
    /// The previous engine was torn down
    pub destroyed: bool,
    /// Listeners bound in this cycle
    pub listeners_bound: usize,
    /// A computation was started
    pub dispatched: bool,
}

/// Lifecycle state, without the engine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    /// No engine yet
    Uninitialized,
    /// Engine live for a mode
    Active(TravelMode),
    /// Surface gone; terminal
    TornDown,
}

/// Ownership record of the live engine
#[derive(Debug)]
struct OverlayHandle {
    engine: Box<dyn RoutingEngine>,
    mode: TravelMode,
    bound: Vec<(RouteEventKind, ListenerId)>,
    last_dispatched: Option<RouteRequest>,
}

impl OverlayHandle {
    fn unbind_listeners(&mut self) {
        for (kind, id) in self.bound.drain(..) {
            if !self.engine.off(kind, id) {
                debug!(%kind, id = id.value(), "Listener was already unbound");
            }
        }
    }

    fn dispose(mut self) {
        self.unbind_listeners();
        self.engine.remove();
    }
}

#[derive(Debug)]
enum OverlayState {
    Uninitialized,
    Active(OverlayHandle),
    TornDown,
}

/// Adapter owning the routing engine of one map surface
pub struct RoutingOverlayAdapter {
    surface: Arc<dyn MapSurface>,
    factory: Arc<dyn RoutingEngineFactory>,
    state: OverlayState,
    engines_built: usize,
}

impl fmt::Debug for RoutingOverlayAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingOverlayAdapter")
            .field("status", &self.status())
            .field("engines_built", &self.engines_built)
            .finish_non_exhaustive()
    }
}

impl RoutingOverlayAdapter {
    /// Create an adapter for a surface; no engine is built until needed
    pub fn new(surface: Arc<dyn MapSurface>, factory: Arc<dyn RoutingEngineFactory>) -> Self {
        Self {
            surface,
            factory,
            state: OverlayState::Uninitialized,
            engines_built: 0,
        }
    }

    /// Current lifecycle state
    pub const fn status(&self) -> OverlayStatus {
        match &self.state {
            OverlayState::Uninitialized => OverlayStatus::Uninitialized,
            OverlayState::Active(handle) => OverlayStatus::Active(handle.mode),
            OverlayState::TornDown => OverlayStatus::TornDown,
        }
    }

    /// Engines built over the adapter's lifetime
    pub const fn engines_built(&self) -> usize {
        self.engines_built
    }

    /// Listeners currently bound on the live engine for an event
    pub fn bound_listeners(&self, kind: RouteEventKind) -> usize {
        match &self.state {
            OverlayState::Active(handle) => handle.engine.listener_count(kind),
            _ => 0,
        }
    }

    /// Bring the engine in line with `inputs`
    ///
    /// # Errors
    ///
    /// Returns an error if an engine cannot be built or attached. Routing
    /// failures never surface here; they go to `on_error`.
    pub fn reconcile(&mut self, inputs: &OverlayInputs) -> Result<ReconcileReport, ApplicationError> {
        let mut report = ReconcileReport::default();

        if matches!(self.state, OverlayState::TornDown) {
            debug!("Reconcile after teardown ignored");
            return Ok(report);
        }
        if self.surface.is_disposed() {
            self.teardown();
            return Ok(report);
        }

        let request = inputs.points.to_request(inputs.mode);

        // Lifecycle
        let mode_changed =
            matches!(&self.state, OverlayState::Active(handle) if handle.mode != inputs.mode);
        if mode_changed {
            if let OverlayState::Active(handle) =
                std::mem::replace(&mut self.state, OverlayState::Uninitialized)
            {
                info!(from = %handle.mode, to = %inputs.mode, "Travel mode changed, rebuilding routing engine");
                handle.dispose();
            }
            report.destroyed = true;
        }
        if matches!(self.state, OverlayState::Uninitialized) && request.is_some() {
            self.state = OverlayState::Active(self.build_engine(inputs.mode)?);
            report.created = true;
        }

        let OverlayState::Active(handle) = &mut self.state else {
            return Ok(report);
        };

        // Listeners
        handle.unbind_listeners();
        for kind in RouteEventKind::ALL {
            let id = handle.engine.on(kind, inputs.callbacks.listener());
            handle.bound.push((kind, id));
        }
        report.listeners_bound = handle.bound.len();

        // Dispatch
        let Some(request) = request else {
            handle.last_dispatched = None;
            return Ok(report);
        };
        if handle.last_dispatched.as_ref() == Some(&request) {
            return Ok(report);
        }
        if !handle.engine.is_attached() || self.surface.is_disposed() {
            debug!("Routing engine not attached to a live surface, skipping dispatch");
            return Ok(report);
        }

        debug!(points = request.points().len(), mode = %request.mode(), "Dispatching route request");
        handle.engine.set_waypoints(request.points().to_vec());
        if let Err(e) = handle.engine.route() {
            inputs.callbacks.fail(&EngineError::new(e.to_string()));
        }
        handle.last_dispatched = Some(request);
        report.dispatched = true;

        Ok(report)
    }

    /// Detach listeners and the engine; the adapter is unusable afterwards
    pub fn teardown(&mut self) {
        if let OverlayState::Active(handle) = std::mem::replace(&mut self.state, OverlayState::TornDown) {
            info!(mode = %handle.mode, "Tearing down routing overlay");
            handle.dispose();
        }
    }

    fn build_engine(&mut self, mode: TravelMode) -> Result<OverlayHandle, ApplicationError> {
        let engine = self.factory.create(EngineOptions::for_mode(mode))?;
        if let Err(e) = engine.add_to(self.surface.clone()) {
            engine.remove();
            return Err(e);
        }
        self.engines_built += 1;
        info!(%mode, overlay = engine.overlay_id().value(), "Routing engine built");

        Ok(OverlayHandle {
            engine,
            mode,
            bound: Vec::with_capacity(RouteEventKind::ALL.len()),
            last_dispatched: None,
        })
    }
}

impl Drop for RoutingOverlayAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use domain::{GeoPoint, RouteStep};
    use parking_lot::Mutex;

    use super::*;
    use crate::{
        ports::{EngineLeg, EngineSummary, LineStyle, Marker, OverlayId, RouteLine},
        services::ListenerRegistry,
    };

    #[derive(Debug, Default)]
    struct FakeSurface {
        disposed: Mutex<bool>,
        overlays: Mutex<HashSet<OverlayId>>,
    }

    impl FakeSurface {
        fn dispose(&self) {
            *self.disposed.lock() = true;
            self.overlays.lock().clear();
        }
    }

    impl MapSurface for FakeSurface {
        fn is_disposed(&self) -> bool {
            *self.disposed.lock()
        }

        fn attach_overlay(&self, id: OverlayId) -> Result<(), ApplicationError> {
            if self.is_disposed() {
                return Err(ApplicationError::SurfaceDisposed);
            }
            self.overlays.lock().insert(id);
            Ok(())
        }

        fn detach_overlay(&self, id: OverlayId) -> bool {
            self.overlays.lock().remove(&id)
        }

        fn has_overlay(&self, id: OverlayId) -> bool {
            self.overlays.lock().contains(&id)
        }

        fn overlay_count(&self) -> usize {
            self.overlays.lock().len()
        }

        fn draw_routes(&self, _id: OverlayId, _lines: Vec<RouteLine>) {}

        fn fit_bounds(&self, _points: &[GeoPoint]) {}

        fn set_markers(&self, _markers: Vec<Marker>) {}
    }

    struct FakeEngine {
        id: OverlayId,
        options: EngineOptions,
        listeners: ListenerRegistry,
        surface: Mutex<Option<Arc<dyn MapSurface>>>,
        waypoints: Mutex<Vec<GeoPoint>>,
        route_calls: Mutex<Vec<Vec<GeoPoint>>>,
        fail_route: bool,
    }

    impl fmt::Debug for FakeEngine {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FakeEngine")
                .field("id", &self.id)
                .field("mode", &self.options.mode)
                .finish_non_exhaustive()
        }
    }

    impl FakeEngine {
        fn emit(&self, event: &RouteEvent) -> usize {
            self.listeners.emit(event)
        }
    }

    impl RoutingEngine for Arc<FakeEngine> {
        fn overlay_id(&self) -> OverlayId {
            self.id
        }

        fn mode(&self) -> TravelMode {
            self.options.mode
        }

        fn set_waypoints(&self, points: Vec<GeoPoint>) {
            *self.waypoints.lock() = points;
        }

        fn waypoints(&self) -> Vec<GeoPoint> {
            self.waypoints.lock().clone()
        }

        fn route(&self) -> Result<(), ApplicationError> {
            if self.fail_route {
                return Err(ApplicationError::Engine("no router".to_string()));
            }
            self.route_calls.lock().push(self.waypoints());
            Ok(())
        }

        fn on(&self, kind: RouteEventKind, listener: RouteListener) -> ListenerId {
            self.listeners.add(kind, listener)
        }

        fn off(&self, kind: RouteEventKind, id: ListenerId) -> bool {
            self.listeners.remove(kind, id)
        }

        fn listener_count(&self, kind: RouteEventKind) -> usize {
            self.listeners.count(kind)
        }

        fn add_to(&self, surface: Arc<dyn MapSurface>) -> Result<(), ApplicationError> {
            surface.attach_overlay(self.id)?;
            *self.surface.lock() = Some(surface);
            Ok(())
        }

        fn remove(&self) {
            if let Some(surface) = self.surface.lock().take() {
                surface.detach_overlay(self.id);
            }
        }

        fn is_attached(&self) -> bool {
            self.surface
                .lock()
                .as_ref()
                .is_some_and(|s| !s.is_disposed() && s.has_overlay(self.id))
        }
    }

    #[derive(Debug, Default)]
    struct FakeFactory {
        built: Mutex<Vec<Arc<FakeEngine>>>,
        fail_route: bool,
    }

    impl FakeFactory {
        fn engines(&self) -> Vec<Arc<FakeEngine>> {
            self.built.lock().clone()
        }

        fn latest(&self) -> Arc<FakeEngine> {
            self.engines().last().cloned().unwrap()
        }
    }

    impl RoutingEngineFactory for FakeFactory {
        fn create(&self, options: EngineOptions) -> Result<Box<dyn RoutingEngine>, ApplicationError> {
            let engine = Arc::new(FakeEngine {
                id: OverlayId::next(),
                options,
                listeners: ListenerRegistry::new(),
                surface: Mutex::new(None),
                waypoints: Mutex::new(Vec::new()),
                route_calls: Mutex::new(Vec::new()),
                fail_route: self.fail_route,
            });
            self.built.lock().push(engine.clone());
            Ok(Box::new(engine))
        }
    }

    #[derive(Debug, Default)]
    struct Recorded {
        found: Mutex<Vec<(String, String)>>,
        routes: Mutex<Vec<RouteResult>>,
        errors: Mutex<Vec<EngineError>>,
    }

    impl Recorded {
        fn callbacks(self: &Arc<Self>) -> RouteCallbacks {
            let found = self.clone();
            let routes = self.clone();
            let errors = self.clone();
            RouteCallbacks::new()
                .on_found(move |s| {
                    found
                        .found
                        .lock()
                        .push((s.distance_km_text(), s.duration_min_text()));
                })
                .on_route(move |r| routes.routes.lock().push(r.clone()))
                .on_error(move |e| errors.errors.lock().push(e.clone()))
        }
    }

    fn origin() -> GeoPoint {
        GeoPoint::new_unchecked(-1.2491, -78.6167)
    }

    fn stop() -> GeoPoint {
        GeoPoint::new_unchecked(-1.2400, -78.6200)
    }

    fn destination() -> GeoPoint {
        GeoPoint::new_unchecked(-1.2543, -78.6229)
    }

    fn full_points() -> RoutePoints {
        RoutePoints {
            origin: Some(origin()),
            waypoints: vec![],
            destination: Some(destination()),
        }
    }

    fn inputs(points: RoutePoints, mode: TravelMode, recorded: &Arc<Recorded>) -> OverlayInputs {
        OverlayInputs {
            points,
            mode,
            callbacks: recorded.callbacks(),
        }
    }

    struct Fixture {
        surface: Arc<FakeSurface>,
        factory: Arc<FakeFactory>,
        adapter: RoutingOverlayAdapter,
        recorded: Arc<Recorded>,
    }

    fn fixture() -> Fixture {
        fixture_with(FakeFactory::default())
    }

    fn fixture_with(factory: FakeFactory) -> Fixture {
        let surface = Arc::new(FakeSurface::default());
        let factory = Arc::new(factory);
        let adapter = RoutingOverlayAdapter::new(surface.clone(), factory.clone());
        Fixture {
            surface,
            factory,
            adapter,
            recorded: Arc::new(Recorded::default()),
        }
    }

    fn summary_route(distance: f64, time: f64) -> EngineRoute {
        EngineRoute {
            summary: Some(EngineSummary {
                total_distance: Some(distance),
                total_time: Some(time),
            }),
            instructions: vec![RouteStep::new("Head north", distance, time)],
            ..EngineRoute::default()
        }
    }

    #[test]
    fn test_no_engine_until_route_is_valid() {
        let mut fx = fixture();
        let points = RoutePoints {
            origin: Some(origin()),
            ..RoutePoints::default()
        };

        let report = fx
            .adapter
            .reconcile(&inputs(points, TravelMode::Driving, &fx.recorded))
            .unwrap();

        assert_eq!(report, ReconcileReport::default());
        assert_eq!(fx.adapter.status(), OverlayStatus::Uninitialized);
        assert!(fx.factory.engines().is_empty());
        assert!(fx.recorded.found.lock().is_empty());
    }

    #[test]
    fn test_first_valid_request_builds_and_dispatches() {
        let mut fx = fixture();

        let report = fx
            .adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        assert!(report.created);
        assert!(!report.destroyed);
        assert_eq!(report.listeners_bound, 3);
        assert!(report.dispatched);
        assert_eq!(fx.adapter.status(), OverlayStatus::Active(TravelMode::Driving));
        assert_eq!(fx.surface.overlay_count(), 1);

        let engine = fx.factory.latest();
        assert_eq!(
            engine.route_calls.lock().as_slice(),
            &[vec![origin(), destination()]]
        );
    }

    #[test]
    fn test_cycling_with_waypoint() {
        let mut fx = fixture();
        let points = RoutePoints {
            origin: Some(origin()),
            waypoints: vec![stop()],
            destination: Some(destination()),
        };

        fx.adapter
            .reconcile(&inputs(points, TravelMode::Cycling, &fx.recorded))
            .unwrap();

        let engine = fx.factory.latest();
        assert_eq!(engine.options.profile(), "cycling");
        assert_eq!(engine.waypoints(), vec![origin(), stop(), destination()]);
        assert_eq!(engine.route_calls.lock().len(), 1);
    }

    #[test]
    fn test_identical_points_are_not_redispatched() {
        let mut fx = fixture();
        let input = inputs(full_points(), TravelMode::Driving, &fx.recorded);

        fx.adapter.reconcile(&input).unwrap();
        let report = fx.adapter.reconcile(&input).unwrap();

        assert!(!report.created);
        assert!(!report.dispatched);
        assert_eq!(fx.factory.latest().route_calls.lock().len(), 1);
    }

    #[test]
    fn test_changed_points_are_dispatched() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        let moved = RoutePoints {
            waypoints: vec![stop()],
            ..full_points()
        };
        let report = fx
            .adapter
            .reconcile(&inputs(moved, TravelMode::Driving, &fx.recorded))
            .unwrap();

        assert!(report.dispatched);
        assert_eq!(fx.factory.engines().len(), 1);
        assert_eq!(fx.factory.latest().route_calls.lock().len(), 2);
    }

    #[test]
    fn test_mode_change_rebuilds_engine() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();
        let first = fx.factory.latest();

        let report = fx
            .adapter
            .reconcile(&inputs(full_points(), TravelMode::Walking, &fx.recorded))
            .unwrap();

        assert!(report.destroyed);
        assert!(report.created);
        assert!(report.dispatched);
        assert_eq!(fx.adapter.status(), OverlayStatus::Active(TravelMode::Walking));

        // old engine fully detached
        assert!(!first.is_attached());
        for kind in RouteEventKind::ALL {
            assert_eq!(first.listener_count(kind), 0);
        }

        let second = fx.factory.latest();
        assert_eq!(second.mode(), TravelMode::Walking);
        assert_eq!(second.route_calls.lock().len(), 1);
        assert_eq!(fx.surface.overlay_count(), 1);
    }

    #[test]
    fn test_constructions_match_distinct_consecutive_modes() {
        let mut fx = fixture();
        let modes = [
            TravelMode::Driving,
            TravelMode::Driving,
            TravelMode::Cycling,
            TravelMode::Cycling,
            TravelMode::Driving,
            TravelMode::Walking,
        ];

        for mode in modes {
            fx.adapter
                .reconcile(&inputs(full_points(), mode, &fx.recorded))
                .unwrap();
            assert_eq!(fx.surface.overlay_count(), 1);
        }

        assert_eq!(fx.adapter.engines_built(), 4);
        assert_eq!(fx.factory.latest().mode(), TravelMode::Walking);
    }

    #[test]
    fn test_rebinding_is_idempotent() {
        let mut fx = fixture();
        let input = inputs(full_points(), TravelMode::Driving, &fx.recorded);

        for _ in 0..5 {
            fx.adapter.reconcile(&input).unwrap();
        }

        for kind in RouteEventKind::ALL {
            assert_eq!(fx.adapter.bound_listeners(kind), 1);
        }

        let ran = fx.factory.latest().emit(&RouteEvent::RoutesFound {
            routes: vec![summary_route(12345.0, 754.0)],
        });
        assert_eq!(ran, 1);
        assert_eq!(fx.recorded.found.lock().len(), 1);
    }

    #[test]
    fn test_latest_callbacks_observe_results() {
        let mut fx = fixture();
        let stale = Arc::new(Recorded::default());
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &stale))
            .unwrap();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        fx.factory.latest().emit(&RouteEvent::RouteSelected {
            route: summary_route(12345.0, 754.0),
        });

        assert!(stale.found.lock().is_empty());
        assert_eq!(
            fx.recorded.found.lock().as_slice(),
            &[("12.35".to_string(), "12.6".to_string())]
        );
        let routes = fx.recorded.routes.lock();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].steps[0].text, "Head north");
    }

    #[test]
    fn test_routes_found_uses_best_route() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        fx.factory.latest().emit(&RouteEvent::RoutesFound {
            routes: vec![
                EngineRoute {
                    legs: Some(vec![
                        EngineLeg {
                            distance: Some(1000.0),
                            duration: Some(60.0),
                        },
                        EngineLeg {
                            distance: Some(2000.0),
                            duration: Some(120.0),
                        },
                    ]),
                    ..EngineRoute::default()
                },
                summary_route(99999.0, 9999.0),
            ],
        });

        let routes = fx.recorded.routes.lock();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance_meters, 3000.0);
        assert_eq!(routes[0].duration_seconds, 180.0);
    }

    #[test]
    fn test_unnormalisable_route_is_dropped() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        fx.factory.latest().emit(&RouteEvent::RoutesFound {
            routes: vec![EngineRoute::default()],
        });
        fx.factory.latest().emit(&RouteEvent::RoutesFound { routes: vec![] });

        assert!(fx.recorded.found.lock().is_empty());
        assert!(fx.recorded.routes.lock().is_empty());
        assert!(fx.recorded.errors.lock().is_empty());
        assert_eq!(fx.adapter.status(), OverlayStatus::Active(TravelMode::Driving));
    }

    #[test]
    fn test_routing_error_reaches_callback_without_teardown() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        fx.factory
            .latest()
            .emit(&RouteEvent::RoutingError(EngineError::with_status(
                "NoRoute",
                "Impossible route between points",
            )));

        assert_eq!(fx.recorded.errors.lock().len(), 1);
        assert_eq!(fx.adapter.status(), OverlayStatus::Active(TravelMode::Driving));
        assert!(fx.factory.latest().is_attached());
        assert_eq!(fx.adapter.engines_built(), 1);
    }

    #[test]
    fn test_route_start_failure_goes_to_on_error() {
        let mut fx = fixture_with(FakeFactory {
            fail_route: true,
            ..FakeFactory::default()
        });

        let report = fx
            .adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        assert!(report.dispatched);
        assert_eq!(fx.recorded.errors.lock().len(), 1);
        assert_eq!(fx.adapter.status(), OverlayStatus::Active(TravelMode::Driving));
    }

    #[test]
    fn test_destination_cleared_stops_dispatch() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        let partial = RoutePoints {
            destination: None,
            ..full_points()
        };
        let report = fx
            .adapter
            .reconcile(&inputs(partial, TravelMode::Driving, &fx.recorded))
            .unwrap();
        assert!(!report.dispatched);
        assert_eq!(report.listeners_bound, 3);

        // restoring the same points is a change again
        let report = fx
            .adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();
        assert!(report.dispatched);
        assert_eq!(fx.factory.latest().route_calls.lock().len(), 2);
    }

    #[test]
    fn test_mode_change_without_valid_points_defers_rebuild() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        let report = fx
            .adapter
            .reconcile(&inputs(RoutePoints::default(), TravelMode::Cycling, &fx.recorded))
            .unwrap();

        assert!(report.destroyed);
        assert!(!report.created);
        assert_eq!(fx.adapter.status(), OverlayStatus::Uninitialized);
        assert_eq!(fx.surface.overlay_count(), 0);
    }

    #[test]
    fn test_teardown_detaches_everything() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();
        let engine = fx.factory.latest();

        fx.adapter.teardown();

        assert_eq!(fx.adapter.status(), OverlayStatus::TornDown);
        assert!(!engine.is_attached());
        for kind in RouteEventKind::ALL {
            assert_eq!(engine.listener_count(kind), 0);
        }

        // terminal
        let report = fx
            .adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();
        assert_eq!(report, ReconcileReport::default());
        assert_eq!(fx.factory.engines().len(), 1);
    }

    #[test]
    fn test_disposed_surface_tears_down_on_reconcile() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();
        let engine = fx.factory.latest();

        fx.surface.dispose();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Cycling, &fx.recorded))
            .unwrap();

        assert_eq!(fx.adapter.status(), OverlayStatus::TornDown);
        assert_eq!(engine.listener_count(RouteEventKind::RoutesFound), 0);
        assert_eq!(fx.factory.engines().len(), 1);
    }

    #[test]
    fn test_drop_tears_down() {
        let fx = fixture();
        let Fixture {
            surface,
            factory,
            mut adapter,
            recorded,
        } = fx;
        adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &recorded))
            .unwrap();
        assert_eq!(surface.overlay_count(), 1);

        drop(adapter);

        assert_eq!(surface.overlay_count(), 0);
        assert_eq!(
            factory.latest().listener_count(RouteEventKind::RouteSelected),
            0
        );
    }

    #[test]
    fn test_primary_and_alternate_styles_differ() {
        let mut fx = fixture();
        fx.adapter
            .reconcile(&inputs(full_points(), TravelMode::Driving, &fx.recorded))
            .unwrap();

        let options = &fx.factory.latest().options;
        assert_eq!(options.primary_style, LineStyle::primary());
        assert_ne!(options.primary_style, options.alternate_style);
    }
}
