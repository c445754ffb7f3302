//! Nominatim geocoding client

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use domain::{GeoPoint, PlaceCandidate};
use moka::future::Cache;
use reqwest::Client;
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, instrument};

use crate::{
    config::NominatimConfig,
    error::GeocodingError,
    models::{NominatimErrorBody, NominatimPlace},
};

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Search places matching a free-text query, best match first
    ///
    /// An empty list means nothing matched.
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodingError>;

    /// Resolve a point to a human-readable address
    async fn reverse(&self, point: GeoPoint) -> Result<String, GeocodingError>;
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Vec<PlaceCandidate>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.cache_ttl_hours * 3600))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Get the client configuration
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Enforce Nominatim's rate limit (max 1 request per second)
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, GeocodingError> {
        self.rate_limit().await;

        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        Ok(response)
    }

    fn language_params(&self, params: &mut Vec<(&'static str, String)>) {
        if !self.config.accept_language.is_empty() {
            params.push(("accept-language", self.config.accept_language.clone()));
        }
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let cache_key = query.to_lowercase();
        if let Some(cache) = &self.cache {
            if let Some(places) = cache.get(&cache_key).await {
                debug!(%query, "Geocoding cache hit");
                return Ok(places);
            }
        }

        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("namedetails", "1".to_string()),
            ("limit", self.config.result_limit.to_string()),
        ];
        self.language_params(&mut params);
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%query, "Searching places");

        let results: Vec<NominatimPlace> = self
            .get("search", &params)
            .await?
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let places: Vec<PlaceCandidate> = results
            .into_iter()
            .filter_map(NominatimPlace::into_candidate)
            .collect();

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, places.clone()).await;
        }
        debug!(%query, count = places.len(), "Place search complete");

        Ok(places)
    }

    #[instrument(skip(self))]
    async fn reverse(&self, point: GeoPoint) -> Result<String, GeocodingError> {
        let mut params = vec![
            ("lat", point.latitude().to_string()),
            ("lon", point.longitude().to_string()),
            ("format", "jsonv2".to_string()),
            ("zoom", self.config.reverse_zoom.to_string()),
        ];
        self.language_params(&mut params);

        debug!(%point, "Reverse geocoding");

        let body: serde_json::Value = self
            .get("reverse", &params)
            .await?
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if let Ok(error) = serde_json::from_value::<NominatimErrorBody>(body.clone()) {
            return Err(GeocodingError::NotFound(format!("{point}: {}", error.error)));
        }

        let place: NominatimPlace =
            serde_json::from_value(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        place
            .display_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GeocodingError::NotFound(point.to_string()))
    }
}
