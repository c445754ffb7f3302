//! Rendering plans and places for the terminal

use std::fmt::Write as _;

use application::RoutePlanner;
use domain::{PlaceCandidate, TravelMode, TripEstimate};
use serde::Serialize;

/// One turn-by-turn step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Instruction text
    pub text: String,
    /// Distance in meters
    pub distance_meters: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// `"{km} km · {min} min"`
    pub figures: String,
}

/// Everything `plan` prints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub mode: TravelMode,
    pub origin: String,
    pub destination: String,
    pub stops: Vec<String>,
    pub distance_km: String,
    pub duration_min: String,
    pub summary: String,
    pub adjusted_minutes: Option<u32>,
    pub traffic_adjusted: bool,
    pub eta: Option<String>,
    pub fuel_cost: Option<f64>,
    pub steps: Vec<StepReport>,
}

impl PlanReport {
    /// Collect the report from a planner holding a found route
    ///
    /// `None` while the planner has no summary.
    pub fn from_planner(
        planner: &RoutePlanner,
        estimate: Option<&TripEstimate>,
        eta: Option<String>,
    ) -> Option<Self> {
        let summary = planner.summary()?;

        Some(Self {
            mode: planner.mode(),
            origin: planner.origin().label.clone(),
            destination: planner.destination().label.clone(),
            stops: planner
                .stops()
                .iter()
                .filter(|stop| stop.position.is_some())
                .map(|stop| stop.label.clone())
                .collect(),
            distance_km: summary.distance_km_text(),
            duration_min: summary.duration_min_text(),
            summary: summary.to_string(),
            adjusted_minutes: estimate.map(|e| e.adjusted_minutes),
            traffic_adjusted: estimate.is_some_and(|e| e.traffic_adjusted),
            eta,
            fuel_cost: estimate.and_then(|e| e.fuel_cost),
            steps: planner
                .steps()
                .iter()
                .map(|step| StepReport {
                    text: step.text.clone(),
                    distance_meters: step.distance_meters,
                    duration_seconds: step.duration_seconds,
                    figures: step.format_figures(),
                })
                .collect(),
        })
    }

    /// Human-readable rendering
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = write!(out, "{}", self.origin);
        for stop in &self.stops {
            let _ = write!(out, " → {stop}");
        }
        let _ = writeln!(out, " → {} ({})", self.destination, self.mode);
        let _ = writeln!(out, "{}", self.summary);

        if let (Some(minutes), Some(eta)) = (self.adjusted_minutes, &self.eta) {
            let note = if self.traffic_adjusted { ", rush hour" } else { "" };
            let _ = writeln!(out, "Arrival: {eta} ({minutes} min{note})");
        }
        match self.fuel_cost {
            Some(cost) if self.mode.is_driving() => {
                let _ = writeln!(out, "Fuel: {cost:.2}");
            },
            Some(_) => {},
            None => {
                let _ = writeln!(out, "Fuel: n/a");
            },
        }

        if !self.steps.is_empty() {
            let _ = writeln!(out, "Steps:");
            for (i, step) in self.steps.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {} ({})", i + 1, step.text, step.figures);
            }
        }
        out
    }
}

/// One line per search suggestion
pub fn render_places(places: &[PlaceCandidate]) -> String {
    if places.is_empty() {
        return "No places found\n".to_string();
    }

    let mut out = String::new();
    for (i, place) in places.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} ({})",
            i + 1,
            place.display_name,
            place.position
        );
    }
    out
}
