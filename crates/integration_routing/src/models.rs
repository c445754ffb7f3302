//! OSRM `route/v1` response models

use domain::{GeoPoint, RouteStep};
use serde::Deserialize;

use crate::{error::RoutingError, instructions};

/// Precision of OSRM's encoded polylines (`geometries=polyline`)
const POLYLINE_PRECISION: u32 = 5;

/// Top-level response body
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<serde_json::Value>,
}

/// Routes returned for one request, best route first
#[derive(Debug, Clone)]
pub struct OsrmRoutes {
    /// Parsed routes
    pub routes: Vec<OsrmRoute>,
    /// The untouched JSON of each route, same order as `routes`
    pub raw: Vec<serde_json::Value>,
}

/// One candidate route
///
/// Every figure is optional: routes from older servers or proxies may carry
/// totals only on the legs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsrmRoute {
    /// Total distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Total duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Encoded polyline of the full route
    #[serde(default)]
    pub geometry: Option<String>,
    /// Route legs, one between each pair of consecutive points
    #[serde(default)]
    pub legs: Vec<OsrmLeg>,
    /// Name of the routing weight
    #[serde(default)]
    pub weight_name: Option<String>,
}

/// Route between two consecutive points
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsrmLeg {
    /// Leg distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Leg duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Names of the main roads used
    #[serde(default)]
    pub summary: String,
    /// Turn-by-turn steps
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

/// One maneuver and the road travelled after it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsrmStep {
    /// Step distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Step duration in seconds
    #[serde(default)]
    pub duration: f64,
    /// Road name
    #[serde(default)]
    pub name: String,
    /// Road reference (e.g. "E35")
    #[serde(default, rename = "ref")]
    pub road_ref: Option<String>,
    /// The maneuver at the start of the step
    #[serde(default)]
    pub maneuver: OsrmManeuver,
}

/// Maneuver descriptor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsrmManeuver {
    /// Maneuver type (`depart`, `turn`, `roundabout`, `arrive`, ...)
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Direction modifier (`left`, `slight right`, `uturn`, ...)
    #[serde(default)]
    pub modifier: Option<String>,
    /// Exit number for roundabouts
    #[serde(default)]
    pub exit: Option<u32>,
    /// Heading after the maneuver in degrees
    #[serde(default)]
    pub bearing_after: Option<f64>,
    /// `[longitude, latitude]` of the maneuver
    #[serde(default)]
    pub location: Vec<f64>,
}

impl OsrmRoute {
    /// Decode the route geometry into points
    ///
    /// A route without geometry decodes to an empty line.
    pub fn decode_geometry(&self) -> Result<Vec<GeoPoint>, RoutingError> {
        let Some(encoded) = self.geometry.as_deref() else {
            return Ok(Vec::new());
        };

        let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
            .map_err(|e| RoutingError::Geometry(e.to_string()))?;

        line.into_points()
            .into_iter()
            .map(|pt| {
                GeoPoint::new(pt.y(), pt.x()).map_err(|e| RoutingError::Geometry(e.to_string()))
            })
            .collect()
    }

    /// Turn-by-turn instructions across all legs
    pub fn instructions(&self) -> Vec<RouteStep> {
        let leg_count = self.legs.len();
        self.legs
            .iter()
            .enumerate()
            .flat_map(|(leg_index, leg)| {
                let is_last_leg = leg_index + 1 == leg_count;
                leg.steps.iter().map(move |step| {
                    RouteStep::new(
                        instructions::describe(step, leg_index, is_last_leg),
                        step.distance,
                        step.duration,
                    )
                })
            })
            .collect()
    }
}
