//! Route planner CLI
//!
//! Plans driving, walking and cycling routes through OpenStreetMap services.

#![allow(clippy::print_stdout)]

mod output;
mod places;
mod plan;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use application::GeocodingPort;
use clap::{Parser, Subcommand};
use domain::{GeoPoint, TravelMode};
use infrastructure::{
    AppConfig, GeocodingAdapter, OsrmEngineFactory, filter_for_verbosity, init_tracing,
};

use crate::{output::render_places, plan::PlanRequest};

/// Route planner CLI
#[derive(Parser)]
#[command(name = "route-planner")]
#[command(author, version, about = "Plan routes with OpenStreetMap data", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./config.toml when present)
    #[arg(short, long, env = "ROUTE_PLANNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a route
    ///
    /// Places are either `lat,lon` pairs or free text resolved to the best
    /// search match.
    /// Example: route-planner plan --from "Parque Cevallos, Ambato" --to -1.3964,-78.4247
    Plan {
        /// Where the route starts
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// Where the route ends
        #[arg(long, allow_hyphen_values = true)]
        to: String,

        /// Intermediate stop, in order (repeatable)
        #[arg(long, allow_hyphen_values = true)]
        via: Vec<String>,

        /// Travel mode: driving, walking or cycling
        #[arg(short, long)]
        mode: Option<TravelMode>,

        /// Apply the rush-hour factor to driving time
        #[arg(long)]
        peak_hour: bool,

        /// Fuel consumption in litres per 100 km
        #[arg(long, allow_hyphen_values = true)]
        fuel_consumption: Option<String>,

        /// Fuel price per litre
        #[arg(long, allow_hyphen_values = true)]
        fuel_price: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search places by name
    Search {
        /// Free-text query
        query: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Name the address at a point
    Reverse {
        /// Latitude
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::load().context("loading configuration")?,
    };
    if let Some(filter) = filter_for_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.telemetry)?;

    match cli.command {
        Commands::Plan {
            from,
            to,
            via,
            mode,
            peak_hour,
            fuel_consumption,
            fuel_price,
            json,
        } => {
            let request = PlanRequest {
                from,
                to,
                via,
                mode,
                peak_hour,
                fuel_consumption,
                fuel_price,
            };
            let geocoder: Arc<dyn GeocodingPort> =
                Arc::new(GeocodingAdapter::nominatim(&config.geocoding)?);
            let factory = Arc::new(OsrmEngineFactory::osrm(&config.routing)?);

            let report = plan::run(&request, &config.planner, geocoder, factory).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }
        },

        Commands::Search { query, json } => {
            let geocoder = GeocodingAdapter::nominatim(&config.geocoding)?;
            let places = geocoder.search_by_text(&query).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&places)?);
            } else {
                print!("{}", render_places(&places));
            }
        },

        Commands::Reverse { lat, lon } => {
            let point = GeoPoint::new(lat, lon)?;
            let geocoder = GeocodingAdapter::nominatim(&config.geocoding)?;
            match geocoder.reverse_lookup(point).await {
                Some(name) => println!("{name}"),
                None => println!("No address found at {point}"),
            }
        },

        Commands::Config => {
            print!("{}", config.to_toml()?);
        },
    }

    Ok(())
}
