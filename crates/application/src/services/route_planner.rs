//! Route planner state
//!
//! Owns origin, destination and stops, the travel mode and the trip
//! settings, and keeps the last found route for presentation.

use chrono::{DateTime, Utc};
use domain::{
    DomainError, FuelSettings, GeoPoint, PEAK_HOUR_FACTOR, RoutePoints, RouteResult, RouteStep,
    RouteSummary, StopId, StopList, TravelMode, TripEstimate,
};
use tracing::{debug, info};

use super::{
    marker_layout::layout_markers,
    routing_overlay::{OverlayInputs, RouteCallbacks},
};
use crate::ports::{GeocodingPort, MapSurface, Marker};

/// Origin or destination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    /// Position, absent until picked
    pub position: Option<GeoPoint>,
    /// Display label
    pub label: String,
}

impl Endpoint {
    fn placed(&self) -> Option<(GeoPoint, &str)> {
        self.position.map(|p| (p, self.label.as_str()))
    }
}

/// Which point a map pick fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapPickTarget {
    /// The origin
    Origin,
    /// The destination
    Destination,
    /// A stop without a position
    Stop(StopId),
}

/// Planner state behind the route form
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    origin: Endpoint,
    destination: Endpoint,
    stops: StopList,
    mode: TravelMode,
    peak_hour: bool,
    peak_factor: f64,
    fuel: Option<FuelSettings>,
    summary: Option<RouteSummary>,
    steps: Vec<RouteStep>,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(TravelMode::default())
    }
}

impl RoutePlanner {
    /// Create a planner with one empty stop and default fuel settings
    #[must_use]
    pub fn new(mode: TravelMode) -> Self {
        Self {
            origin: Endpoint::default(),
            destination: Endpoint::default(),
            stops: StopList::default(),
            mode,
            peak_hour: false,
            peak_factor: PEAK_HOUR_FACTOR,
            fuel: Some(FuelSettings::default()),
            summary: None,
            steps: Vec::new(),
        }
    }

    /// Override the rush-hour duration factor
    #[must_use]
    pub fn with_peak_factor(mut self, factor: f64) -> Self {
        self.peak_factor = factor;
        self
    }

    /// Origin
    pub const fn origin(&self) -> &Endpoint {
        &self.origin
    }

    /// Destination
    pub const fn destination(&self) -> &Endpoint {
        &self.destination
    }

    /// Intermediate stops
    pub const fn stops(&self) -> &StopList {
        &self.stops
    }

    /// Travel mode
    pub const fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Whether rush hour is on
    pub const fn peak_hour(&self) -> bool {
        self.peak_hour
    }

    /// Fuel settings, `None` when the entered values are unusable
    pub const fn fuel(&self) -> Option<&FuelSettings> {
        self.fuel.as_ref()
    }

    /// Set the origin
    pub fn set_origin(&mut self, position: GeoPoint, label: impl Into<String>) {
        self.origin = Endpoint {
            position: Some(position),
            label: label.into(),
        };
    }

    /// Set the destination
    pub fn set_destination(&mut self, position: GeoPoint, label: impl Into<String>) {
        self.destination = Endpoint {
            position: Some(position),
            label: label.into(),
        };
    }

    /// Append an empty stop
    pub fn add_stop(&mut self) -> StopId {
        self.stops.add()
    }

    /// Remove a stop; the last one stays
    pub fn remove_stop(&mut self, id: StopId) -> Result<(), DomainError> {
        self.stops.remove(id).map(|_| ())
    }

    /// Swap the stop at `index` with its predecessor
    pub fn move_stop_up(&mut self, index: usize) -> bool {
        self.stops.move_up(index)
    }

    /// Swap the stop at `index` with its successor
    pub fn move_stop_down(&mut self, index: usize) -> bool {
        self.stops.move_down(index)
    }

    /// Set the stop at `index` from a picked suggestion
    pub fn set_stop(
        &mut self,
        index: usize,
        position: GeoPoint,
        label: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.stops.place_at(index, position, label)
    }

    /// Change the travel mode
    pub fn set_mode(&mut self, mode: TravelMode) {
        self.mode = mode;
    }

    /// Toggle rush hour
    pub fn set_peak_hour(&mut self, on: bool) {
        self.peak_hour = on;
    }

    /// Set fuel settings
    pub fn set_fuel(&mut self, fuel: FuelSettings) {
        self.fuel = Some(fuel);
    }

    /// Set fuel settings from entered text; unusable input turns the cost off
    pub fn set_fuel_inputs(&mut self, consumption: &str, price: &str) {
        self.fuel = FuelSettings::parse(consumption, price);
        if self.fuel.is_none() {
            debug!(%consumption, %price, "Fuel settings unusable, cost estimate disabled");
        }
    }

    /// Point a map pick would fill: origin, then destination, then the first
    /// stop without a position
    pub fn pick_target(&self) -> Option<MapPickTarget> {
        if self.origin.position.is_none() {
            Some(MapPickTarget::Origin)
        } else if self.destination.position.is_none() {
            Some(MapPickTarget::Destination)
        } else {
            self.stops.first_unplaced().map(MapPickTarget::Stop)
        }
    }

    /// Apply a picked point; the label is only replaced when a name is given
    pub fn apply_pick(
        &mut self,
        target: MapPickTarget,
        position: GeoPoint,
        name: Option<String>,
    ) -> Result<(), DomainError> {
        let endpoint = match target {
            MapPickTarget::Origin => &mut self.origin,
            MapPickTarget::Destination => &mut self.destination,
            MapPickTarget::Stop(id) => return self.stops.place(id, position, name),
        };
        endpoint.position = Some(position);
        if let Some(name) = name {
            endpoint.label = name;
        }
        Ok(())
    }

    /// Handle a click on the map: fill the next free point, named by reverse lookup
    ///
    /// Returns the filled target, or `None` when every point is set.
    pub async fn pick_on_map(
        &mut self,
        geocoder: &dyn GeocodingPort,
        position: GeoPoint,
    ) -> Result<Option<MapPickTarget>, DomainError> {
        let Some(target) = self.pick_target() else {
            debug!(%position, "Map pick ignored, all points set");
            return Ok(None);
        };

        let name = geocoder.reverse_lookup(position).await;
        debug!(?target, %position, named = name.is_some(), "Map pick");
        self.apply_pick(target, position, name)?;
        Ok(Some(target))
    }

    /// Points for the routing overlay
    pub fn route_points(&self) -> RoutePoints {
        RoutePoints {
            origin: self.origin.position,
            waypoints: self.stops.waypoints(),
            destination: self.destination.position,
        }
    }

    /// Overlay inputs for the current state
    pub fn overlay_inputs(&self, callbacks: RouteCallbacks) -> OverlayInputs {
        OverlayInputs {
            points: self.route_points(),
            mode: self.mode,
            callbacks,
        }
    }

    /// Request a recalculation: clears the shown route when both ends are set
    pub fn calculate_route(&mut self) -> bool {
        if self.origin.position.is_none() || self.destination.position.is_none() {
            return false;
        }
        info!(mode = %self.mode, stops = self.stops.waypoints().len(), "Route recalculation requested");
        self.summary = None;
        self.steps.clear();
        true
    }

    /// Record the summary of a found route
    pub fn record_summary(&mut self, summary: RouteSummary) {
        self.summary = Some(summary);
    }

    /// Record a found route: summary and steps
    pub fn record_route(&mut self, result: &RouteResult) {
        self.summary = Some(result.summary());
        self.steps.clone_from(&result.steps);
    }

    /// Summary of the shown route
    pub const fn summary(&self) -> Option<&RouteSummary> {
        self.summary.as_ref()
    }

    /// Summary line, `"{km} km · {min} min"`
    pub fn summary_line(&self) -> Option<String> {
        self.summary.as_ref().map(ToString::to_string)
    }

    /// Steps of the shown route
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Adjusted duration, ETA and fuel cost of the shown route
    pub fn trip_estimate(&self, now: DateTime<Utc>) -> Option<TripEstimate> {
        let summary = self.summary.as_ref()?;
        Some(TripEstimate::compute(
            summary,
            self.mode,
            self.peak_hour,
            self.peak_factor,
            self.fuel.as_ref(),
            now,
        ))
    }

    /// Markers for all placed points
    pub fn markers(&self) -> Vec<Marker> {
        layout_markers(self.origin.placed(), self.destination.placed(), &self.stops)
    }

    /// Push the current markers to a surface
    pub fn render_markers(&self, surface: &dyn MapSurface) {
        surface.set_markers(self.markers());
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::ports::{MarkerKind, MockGeocodingPort, MockMapSurface};

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new_unchecked(lat, lon)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn found_route() -> RouteResult {
        RouteResult::new(
            RouteSummary::from_totals(12345.0, 754.0).unwrap(),
            vec![RouteStep::new("Head north on Avenida Cevallos", 1500.0, 120.0)],
            serde_json::Value::Null,
        )
    }

    #[test]
    fn test_new_planner() {
        let planner = RoutePlanner::default();
        assert_eq!(planner.mode(), TravelMode::Driving);
        assert_eq!(planner.stops().len(), 1);
        assert_eq!(planner.fuel(), Some(&FuelSettings::default()));
        assert!(planner.summary_line().is_none());
        assert!(planner.trip_estimate(now()).is_none());
    }

    #[test]
    fn test_pick_target_order() {
        let mut planner = RoutePlanner::default();
        assert_eq!(planner.pick_target(), Some(MapPickTarget::Origin));

        planner.set_origin(point(-1.24, -78.61), "A");
        assert_eq!(planner.pick_target(), Some(MapPickTarget::Destination));

        planner.set_destination(point(-1.26, -78.63), "B");
        assert_eq!(
            planner.pick_target(),
            Some(MapPickTarget::Stop(StopId::new(1)))
        );

        planner.set_stop(0, point(-1.25, -78.62), "C").unwrap();
        assert_eq!(planner.pick_target(), None);
    }

    #[tokio::test]
    async fn test_pick_on_map_uses_reverse_name() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_reverse_lookup()
            .times(1)
            .returning(|_| Some("Parque Cevallos, Ambato".to_string()));

        let mut planner = RoutePlanner::default();
        let target = planner
            .pick_on_map(&geocoder, point(-1.2417, -78.6197))
            .await
            .unwrap();

        assert_eq!(target, Some(MapPickTarget::Origin));
        assert_eq!(planner.origin().position, Some(point(-1.2417, -78.6197)));
        assert_eq!(planner.origin().label, "Parque Cevallos, Ambato");
    }

    #[tokio::test]
    async fn test_pick_on_map_keeps_label_without_name() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_reverse_lookup().returning(|_| None);

        let mut planner = RoutePlanner::default();
        planner.set_origin(point(-1.24, -78.61), "A");
        planner.set_destination(point(-1.26, -78.63), "B");
        planner
            .apply_pick(
                MapPickTarget::Stop(StopId::new(1)),
                point(-1.25, -78.62),
                Some("Mercado".to_string()),
            )
            .unwrap();
        planner.add_stop();

        let target = planner
            .pick_on_map(&geocoder, point(-1.255, -78.625))
            .await
            .unwrap();
        assert_eq!(target, Some(MapPickTarget::Stop(StopId::new(2))));
        assert_eq!(planner.stops().get(1).unwrap().label, "");
        assert!(planner.stops().get(1).unwrap().is_placed());

        // relabel keeps the old label when reverse lookup fails
        planner
            .apply_pick(MapPickTarget::Origin, point(-1.0, -78.0), None)
            .unwrap();
        assert_eq!(planner.origin().label, "A");
    }

    #[tokio::test]
    async fn test_pick_on_map_when_everything_is_set() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_reverse_lookup().times(0);

        let mut planner = RoutePlanner::default();
        planner.set_origin(point(-1.24, -78.61), "A");
        planner.set_destination(point(-1.26, -78.63), "B");
        planner.set_stop(0, point(-1.25, -78.62), "C").unwrap();

        let target = planner
            .pick_on_map(&geocoder, point(-1.0, -78.0))
            .await
            .unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn test_route_points_skip_unplaced_stops() {
        let mut planner = RoutePlanner::new(TravelMode::Cycling);
        planner.set_origin(point(-1.24, -78.61), "A");
        planner.set_destination(point(-1.26, -78.63), "B");
        planner.add_stop();
        planner.set_stop(1, point(-1.25, -78.62), "C").unwrap();

        let points = planner.route_points();
        assert_eq!(points.waypoints, vec![point(-1.25, -78.62)]);

        let inputs = planner.overlay_inputs(RouteCallbacks::new());
        assert_eq!(inputs.mode, TravelMode::Cycling);
        assert_eq!(
            inputs.points.to_request(inputs.mode).unwrap().points(),
            &[point(-1.24, -78.61), point(-1.25, -78.62), point(-1.26, -78.63)]
        );
    }

    #[test]
    fn test_stop_reordering() {
        let mut planner = RoutePlanner::default();
        let second = planner.add_stop();
        assert!(planner.move_stop_up(1));
        assert_eq!(planner.stops().get(0).unwrap().id, second);
        assert!(!planner.move_stop_up(0));
        assert!(!planner.move_stop_down(1));
        planner.remove_stop(second).unwrap();
        assert!(planner.remove_stop(StopId::new(1)).is_err());
    }

    #[test]
    fn test_calculate_route_clears_results() {
        let mut planner = RoutePlanner::default();
        planner.record_route(&found_route());
        assert!(!planner.calculate_route());
        assert!(planner.summary().is_some());

        planner.set_origin(point(-1.24, -78.61), "A");
        planner.set_destination(point(-1.26, -78.63), "B");
        assert!(planner.calculate_route());
        assert!(planner.summary().is_none());
        assert!(planner.steps().is_empty());
    }

    #[test]
    fn test_presentation_values() {
        let mut planner = RoutePlanner::default();
        planner.record_route(&found_route());

        assert_eq!(
            planner.summary_line().as_deref(),
            Some("12.35 km · 12.6 min")
        );
        assert_eq!(planner.steps().len(), 1);
        assert_eq!(planner.steps()[0].format_figures(), "1.50 km · 2 min");

        let estimate = planner.trip_estimate(now()).unwrap();
        assert_eq!(estimate.adjusted_minutes, 13);
        assert_eq!(estimate.eta_label(&Utc).as_deref(), Some("08:13"));
        assert_eq!(estimate.fuel_cost, Some(2.62));
    }

    #[test]
    fn test_peak_hour_only_for_driving() {
        let mut planner = RoutePlanner::default();
        planner.record_route(&found_route());
        planner.set_peak_hour(true);

        let estimate = planner.trip_estimate(now()).unwrap();
        assert_eq!(estimate.adjusted_minutes, 16);
        assert!(estimate.traffic_adjusted);

        planner.set_mode(TravelMode::Walking);
        let estimate = planner.trip_estimate(now()).unwrap();
        assert_eq!(estimate.adjusted_minutes, 13);
        assert_eq!(estimate.fuel_cost, Some(0.0));
    }

    #[test]
    fn test_invalid_fuel_input_disables_cost() {
        let mut planner = RoutePlanner::default();
        planner.record_route(&found_route());
        planner.set_fuel_inputs("abc", "2.5");

        assert!(planner.fuel().is_none());
        assert_eq!(planner.trip_estimate(now()).unwrap().fuel_cost, None);

        planner.set_fuel_inputs("8.5", "2.5");
        assert_eq!(planner.trip_estimate(now()).unwrap().fuel_cost, Some(2.62));
    }

    #[test]
    fn test_render_markers() {
        let mut planner = RoutePlanner::default();
        planner.set_origin(point(-1.24, -78.61), "Parque Cevallos");

        let mut surface = MockMapSurface::new();
        surface
            .expect_set_markers()
            .withf(|markers| markers.len() == 1 && markers[0].kind == MarkerKind::Origin)
            .times(1)
            .return_const(());

        planner.render_markers(&surface);
    }
}
