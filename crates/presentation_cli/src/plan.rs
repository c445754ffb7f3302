//! The `plan` command: resolve places, route through the overlay, report

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use application::{
    EngineError, GeocodingPort, RouteCallbacks, RoutePlanner, RoutingEngineFactory,
    RoutingOverlayAdapter,
};
use chrono::{Local, Utc};
use domain::{RouteResult, TravelMode};
use infrastructure::{HeadlessMapSurface, PlannerConfig};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{output::PlanReport, places::PlaceResolver};

/// Arguments of one plan
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub from: String,
    pub to: String,
    pub via: Vec<String>,
    pub mode: Option<TravelMode>,
    pub peak_hour: bool,
    pub fuel_consumption: Option<String>,
    pub fuel_price: Option<String>,
}

enum Outcome {
    Route(RouteResult),
    Failed(EngineError),
}

/// Fill a planner from resolved arguments
async fn prepare_planner(
    request: &PlanRequest,
    settings: &PlannerConfig,
    resolver: &PlaceResolver,
) -> Result<RoutePlanner> {
    let mode = request.mode.unwrap_or(settings.default_mode);
    let mut planner = RoutePlanner::new(mode).with_peak_factor(settings.peak_hour_factor);
    planner.set_peak_hour(request.peak_hour);

    match (&request.fuel_consumption, &request.fuel_price) {
        (None, None) => planner.set_fuel(settings.fuel_settings()?),
        (consumption, price) => {
            let consumption = consumption
                .clone()
                .unwrap_or_else(|| settings.fuel_consumption_l_per_100km.to_string());
            let price = price
                .clone()
                .unwrap_or_else(|| settings.fuel_price_per_litre.to_string());
            planner.set_fuel_inputs(&consumption, &price);
        },
    }

    let origin = resolver
        .resolve(&request.from)
        .await
        .with_context(|| format!("resolving origin '{}'", request.from))?;
    planner.set_origin(origin.position, origin.label);

    for (index, via) in request.via.iter().enumerate() {
        let stop = resolver
            .resolve(via)
            .await
            .with_context(|| format!("resolving stop '{via}'"))?;
        if index > 0 {
            planner.add_stop();
        }
        planner.set_stop(index, stop.position, stop.label)?;
    }

    let destination = resolver
        .resolve(&request.to)
        .await
        .with_context(|| format!("resolving destination '{}'", request.to))?;
    planner.set_destination(destination.position, destination.label);

    Ok(planner)
}

/// Compute the route and build the report
pub async fn run(
    request: &PlanRequest,
    settings: &PlannerConfig,
    geocoder: Arc<dyn GeocodingPort>,
    factory: Arc<dyn RoutingEngineFactory>,
) -> Result<PlanReport> {
    let resolver = PlaceResolver::new(geocoder, settings.min_query_chars);
    let mut planner = prepare_planner(request, settings, &resolver).await?;
    planner.calculate_route();

    let surface = Arc::new(HeadlessMapSurface::new());
    planner.render_markers(surface.as_ref());
    debug!(markers = surface.markers().len(), "Markers placed");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let error_tx = tx.clone();
    let callbacks = RouteCallbacks::new()
        .on_route(move |route| {
            let _ = tx.send(Outcome::Route(route.clone()));
        })
        .on_error(move |error| {
            let _ = error_tx.send(Outcome::Failed(error.clone()));
        });

    let mut overlay = RoutingOverlayAdapter::new(surface.clone(), factory);
    let report = overlay.reconcile(&planner.overlay_inputs(callbacks))?;
    if !report.dispatched {
        bail!("origin and destination are required to plan a route");
    }

    let outcome = tokio::time::timeout(settings.route_timeout(), rx.recv())
        .await
        .context("timed out waiting for the routing service")?
        .context("routing engine stopped without an answer")?;
    overlay.teardown();

    match outcome {
        Outcome::Route(route) => planner.record_route(&route),
        Outcome::Failed(error) => match error.status {
            Some(status) => bail!("routing failed ({status}): {}", error.message),
            None => bail!("routing failed: {}", error.message),
        },
    }
    info!(summary = ?planner.summary_line(), "Route planned");

    let estimate = planner.trip_estimate(Utc::now());
    let eta = estimate.as_ref().and_then(|e| e.eta_label(&Local));
    PlanReport::from_planner(&planner, estimate.as_ref(), eta)
        .context("route found without a summary")
}
