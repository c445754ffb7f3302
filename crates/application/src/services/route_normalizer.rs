//! Route result normalisation
//!
//! Engines report totals in different places. Precedence: the precomputed
//! summary, then route-level totals, then the sum over legs.

use domain::{DomainError, RouteResult, RouteSummary};
use thiserror::Error;

use crate::ports::EngineRoute;

/// Why a route could not be normalised
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// Neither a summary, totals nor leg figures were present
    #[error("route carries no distance/duration figures")]
    NoFigures,

    /// Figures were present but not usable (NaN, infinite, negative)
    #[error(transparent)]
    InvalidFigures(#[from] DomainError),
}

/// Derive distance and duration totals from an engine route
pub fn derive_totals(route: &EngineRoute) -> Option<(f64, f64)> {
    let distance = route
        .summary
        .and_then(|s| s.total_distance)
        .or(route.distance)
        .or_else(|| sum_legs(route, |leg| leg.distance))?;
    let duration = route
        .summary
        .and_then(|s| s.total_time)
        .or(route.duration)
        .or_else(|| sum_legs(route, |leg| leg.duration))?;
    Some((distance, duration))
}

/// Sum the figure over the legs that report it; `None` if none do
fn sum_legs(
    route: &EngineRoute,
    figure: impl Fn(&crate::ports::EngineLeg) -> Option<f64>,
) -> Option<f64> {
    route
        .legs
        .as_deref()?
        .iter()
        .filter_map(figure)
        .fold(None, |acc, value| Some(acc.unwrap_or(0.0) + value))
}

/// Turn an engine route into a [`RouteResult`]
pub fn normalize(route: &EngineRoute) -> Result<RouteResult, NormalizeError> {
    let (distance, duration) = derive_totals(route).ok_or(NormalizeError::NoFigures)?;
    let summary = RouteSummary::from_totals(distance, duration)?;
    Ok(RouteResult::new(
        summary,
        route.instructions.clone(),
        route.raw.clone(),
    ))
}
