//! Derived trip figures: adjusted duration, arrival time and fuel cost

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::route::RouteSummary;
use crate::value_objects::{FuelSettings, TravelMode};

/// Duration multiplier applied to driving routes during rush hour
pub const PEAK_HOUR_FACTOR: f64 = 1.3;

/// Figures shown next to a found route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEstimate {
    /// Travel time in whole minutes after the rush-hour adjustment
    pub adjusted_minutes: u32,
    /// Whether the rush-hour factor was applied
    pub traffic_adjusted: bool,
    /// Estimated time of arrival; `None` when the trip rounds to zero minutes
    pub eta: Option<DateTime<Utc>>,
    /// Fuel cost of the trip
    ///
    /// Zero for walking and cycling; `None` for driving when the fuel
    /// settings could not be parsed.
    pub fuel_cost: Option<f64>,
}

impl TripEstimate {
    /// Derive the estimate for a found route
    ///
    /// The rush-hour `peak_factor` only applies to driving routes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute(
        summary: &RouteSummary,
        mode: TravelMode,
        peak_hour: bool,
        peak_factor: f64,
        fuel: Option<&FuelSettings>,
        now: DateTime<Utc>,
    ) -> Self {
        let traffic_adjusted = peak_hour && mode.is_driving();
        let factor = if traffic_adjusted { peak_factor } else { 1.0 };
        let adjusted_minutes = (summary.duration_minutes() * factor).round().max(0.0) as u32;
        let eta = (adjusted_minutes > 0)
            .then(|| now + Duration::minutes(i64::from(adjusted_minutes)));

        let fuel_cost = if mode.is_driving() {
            fuel.map(|f| f.cost_for_km(summary.distance_km()))
        } else {
            Some(0.0)
        };

        Self {
            adjusted_minutes,
            traffic_adjusted,
            eta,
            fuel_cost,
        }
    }

    /// Arrival time as `HH:MM` in the given timezone
    #[must_use]
    pub fn eta_label<Tz: chrono::TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.eta.map(|eta| eta.with_timezone(tz).format("%H:%M").to_string())
    }
}
