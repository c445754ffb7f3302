//! OSRM route client

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoPoint;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::{
    config::OsrmConfig,
    error::RoutingError,
    models::{OsrmResponse, OsrmRoute, OsrmRoutes},
};

/// Trait for route computation clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Compute routes through `points` (in order) for a service profile
    ///
    /// `profile` is the wire profile (`driving`, `foot`, `bicycle`).
    async fn route(&self, profile: &str, points: &[GeoPoint]) -> Result<OsrmRoutes, RoutingError>;
}

/// OSRM `route/v1` client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Get the client configuration
    #[must_use]
    pub const fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Build the request URL: `{base}/{profile}/{lon},{lat};{lon},{lat}...`
    fn route_url(&self, profile: &str, points: &[GeoPoint]) -> String {
        let coordinates = points
            .iter()
            .map(|p| format!("{},{}", p.longitude(), p.latitude()))
            .collect::<Vec<String>>()
            .join(";");
        format!(
            "{}/{profile}/{coordinates}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn query_params(&self) -> [(&'static str, &'static str); 4] {
        [
            ("overview", "full"),
            ("alternatives", bool_str(self.config.alternatives)),
            ("steps", bool_str(self.config.steps)),
            ("geometries", "polyline"),
        ]
    }

    /// Parse a response body into routes
    fn parse_routes(body: &str) -> Result<OsrmRoutes, RoutingError> {
        let response: OsrmResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if response.code != "Ok" {
            return Err(RoutingError::Service {
                message: response.message.unwrap_or_else(|| response.code.clone()),
                code: response.code,
            });
        }

        let mut routes = Vec::with_capacity(response.routes.len());
        let mut raw = Vec::with_capacity(response.routes.len());
        for value in response.routes {
            match serde_json::from_value::<OsrmRoute>(value.clone()) {
                Ok(route) => {
                    routes.push(route);
                    raw.push(value);
                },
                Err(e) => warn!(error = %e, "Skipping unparseable route"),
            }
        }

        Ok(OsrmRoutes { routes, raw })
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self, points), fields(points = points.len()))]
    async fn route(&self, profile: &str, points: &[GeoPoint]) -> Result<OsrmRoutes, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InvalidRequest(format!(
                "at least two points required, got {}",
                points.len()
            )));
        }

        let url = self.route_url(profile, points);
        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
        }

        // OSRM reports NoRoute and friends as 400 with a JSON body
        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;
        let routes = Self::parse_routes(&body).map_err(|e| match e {
            RoutingError::ParseError(_) if !status.is_success() => {
                RoutingError::RequestFailed(format!("HTTP {status}"))
            },
            other => other,
        })?;

        debug!(count = routes.routes.len(), "Routes received");
        Ok(routes)
    }
}

const fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
