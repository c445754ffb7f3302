//! Route requests and results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;
use crate::value_objects::{GeoPoint, TravelMode};

/// The points a route is planned through, as currently known
///
/// Origin and destination may still be missing; only a complete set of
/// points turns into a [`RouteRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePoints {
    /// Start of the route
    pub origin: Option<GeoPoint>,
    /// Intermediate stops, in order
    pub waypoints: Vec<GeoPoint>,
    /// End of the route
    pub destination: Option<GeoPoint>,
}

impl RoutePoints {
    /// Build a request when both origin and destination are known
    #[must_use]
    pub fn to_request(&self, mode: TravelMode) -> Option<RouteRequest> {
        let origin = self.origin?;
        let destination = self.destination?;
        Some(RouteRequest::new(
            origin,
            self.waypoints.iter().copied(),
            destination,
            mode,
        ))
    }
}

/// A complete routing request: origin, waypoints, destination and mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields")]
pub struct RouteRequest {
    points: Vec<GeoPoint>,
    mode: TravelMode,
}

#[derive(Deserialize)]
struct RequestFields {
    points: Vec<GeoPoint>,
    mode: TravelMode,
}

impl TryFrom<RequestFields> for RouteRequest {
    type Error = DomainError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        if fields.points.len() < 2 {
            return Err(DomainError::ValidationError(format!(
                "a route needs origin and destination, got {} point(s)",
                fields.points.len()
            )));
        }
        Ok(Self {
            points: fields.points,
            mode: fields.mode,
        })
    }
}

impl RouteRequest {
    /// Create a request; points are ordered origin, waypoints, destination
    pub fn new(
        origin: GeoPoint,
        waypoints: impl IntoIterator<Item = GeoPoint>,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Self {
        let mut points = vec![origin];
        points.extend(waypoints);
        points.push(destination);
        Self { points, mode }
    }

    /// All points in route order (at least two)
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Start of the route
    #[must_use]
    pub fn origin(&self) -> GeoPoint {
        self.points[0]
    }

    /// End of the route
    #[must_use]
    pub fn destination(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// Intermediate stops
    #[must_use]
    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.points[1..self.points.len() - 1]
    }

    /// Travel mode
    #[must_use]
    pub const fn mode(&self) -> TravelMode {
        self.mode
    }
}

/// Total distance and duration of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    distance_meters: f64,
    duration_seconds: f64,
}

impl RouteSummary {
    /// Create a summary from totals in meters and seconds
    ///
    /// # Errors
    ///
    /// Returns `InvalidRouteFigures` for negative, NaN or infinite totals.
    pub fn from_totals(distance_meters: f64, duration_seconds: f64) -> Result<Self, DomainError> {
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(DomainError::InvalidRouteFigures(format!(
                "distance {distance_meters} m"
            )));
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(DomainError::InvalidRouteFigures(format!(
                "duration {duration_seconds} s"
            )));
        }
        Ok(Self {
            distance_meters,
            duration_seconds,
        })
    }

    /// Total distance in meters
    #[must_use]
    pub const fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Total duration in seconds
    #[must_use]
    pub const fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Distance in kilometres with two decimals, e.g. `"12.35"`
    #[must_use]
    pub fn distance_km_text(&self) -> String {
        format!("{:.2}", self.distance_meters / 1000.0)
    }

    /// Duration in minutes with one decimal, e.g. `"12.6"`
    #[must_use]
    pub fn duration_min_text(&self) -> String {
        format!("{:.1}", self.duration_seconds / 60.0)
    }

    /// Kilometres as displayed (rounded to two decimals)
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        (self.distance_meters / 10.0).round() / 100.0
    }

    /// Minutes as displayed (rounded to one decimal)
    #[must_use]
    pub fn duration_minutes(&self) -> f64 {
        (self.duration_seconds / 6.0).round() / 10.0
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} km · {} min",
            self.distance_km_text(),
            self.duration_min_text()
        )
    }
}

/// One turn-by-turn instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Instruction text
    pub text: String,
    /// Length of the step in meters
    pub distance_meters: f64,
    /// Duration of the step in seconds
    pub duration_seconds: f64,
}

impl RouteStep {
    /// Create a step
    #[must_use]
    pub fn new(text: impl Into<String>, distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            text: text.into(),
            distance_meters,
            duration_seconds,
        }
    }

    /// Format the step figures as shown under the instruction
    #[must_use]
    pub fn format_figures(&self) -> String {
        format!(
            "{:.2} km · {:.0} min",
            self.distance_meters / 1000.0,
            self.duration_seconds / 60.0
        )
    }
}

impl fmt::Display for RouteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.format_figures())
    }
}

/// A normalised route as reported to the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
    /// Turn-by-turn instructions
    pub steps: Vec<RouteStep>,
    /// Engine-specific payload, kept opaque
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl RouteResult {
    /// Create a result from a validated summary
    #[must_use]
    pub const fn new(summary: RouteSummary, steps: Vec<RouteStep>, raw: serde_json::Value) -> Self {
        Self {
            distance_meters: summary.distance_meters,
            duration_seconds: summary.duration_seconds,
            steps,
            raw,
        }
    }

    /// Distance and duration totals
    #[must_use]
    pub const fn summary(&self) -> RouteSummary {
        RouteSummary {
            distance_meters: self.distance_meters,
            duration_seconds: self.duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn request_requires_origin_and_destination() {
        let points = RoutePoints {
            origin: Some(point(1.0, 1.0)),
            waypoints: vec![],
            destination: None,
        };
        assert!(points.to_request(TravelMode::Driving).is_none());
    }

    #[test]
    fn request_orders_points() {
        let points = RoutePoints {
            origin: Some(point(1.0, 1.0)),
            waypoints: vec![point(2.0, 2.0)],
            destination: Some(point(3.0, 3.0)),
        };
        let request = points.to_request(TravelMode::Cycling).unwrap();

        assert_eq!(
            request.points(),
            &[point(1.0, 1.0), point(2.0, 2.0), point(3.0, 3.0)]
        );
        assert_eq!(request.origin(), point(1.0, 1.0));
        assert_eq!(request.destination(), point(3.0, 3.0));
        assert_eq!(request.waypoints(), &[point(2.0, 2.0)]);
        assert_eq!(request.mode(), TravelMode::Cycling);
    }

    #[test]
    fn requests_with_same_contents_are_equal() {
        let a = RouteRequest::new(point(1.0, 1.0), [], point(2.0, 2.0), TravelMode::Driving);
        let b = RouteRequest::new(point(1.0, 1.0), [], point(2.0, 2.0), TravelMode::Driving);
        assert_eq!(a, b);
    }

    #[test]
    fn summary_text_rounding() {
        let summary = RouteSummary::from_totals(12345.0, 754.0).unwrap();
        assert_eq!(summary.distance_km_text(), "12.35");
        assert_eq!(summary.duration_min_text(), "12.6");
        assert_eq!(summary.to_string(), "12.35 km · 12.6 min");
    }

    #[test]
    fn summary_displayed_values() {
        let summary = RouteSummary::from_totals(12345.0, 754.0).unwrap();
        assert!((summary.distance_km() - 12.35).abs() < 1e-9);
        assert!((summary.duration_minutes() - 12.6).abs() < 1e-9);
    }

    #[test]
    fn summary_rejects_invalid_totals() {
        assert!(RouteSummary::from_totals(f64::NAN, 1.0).is_err());
        assert!(RouteSummary::from_totals(1.0, -5.0).is_err());
        assert!(RouteSummary::from_totals(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn step_figures() {
        let step = RouteStep::new("Turn left onto Avenida Cevallos", 1530.0, 185.0);
        assert_eq!(step.format_figures(), "1.53 km · 3 min");
        assert!(step.to_string().starts_with("Turn left onto Avenida Cevallos"));
    }

    #[test]
    fn result_summary_round_trips_totals() {
        let summary = RouteSummary::from_totals(3000.0, 180.0).unwrap();
        let result = RouteResult::new(summary, vec![], serde_json::Value::Null);
        assert_eq!(result.summary(), summary);
    }

    #[test]
    fn request_deserialization_requires_two_points() {
        let err = serde_json::from_str::<RouteRequest>(
            r#"{"points":[{"latitude":-1.24,"longitude":-78.62}],"mode":"driving"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("origin and destination"));

        let request = RouteRequest::new(
            GeoPoint::new_unchecked(-1.24, -78.62),
            [],
            GeoPoint::new_unchecked(-1.25, -78.62),
            TravelMode::Walking,
        );
        let json = serde_json::to_string(&request).unwrap();
        let back: RouteRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
        assert!(back.waypoints().is_empty());
    }
}
