//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use std::sync::Arc;

use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{GeoPoint, PlaceCandidate};
use integration_geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use tracing::{debug, instrument, warn};

/// Adapter for place search and reverse lookup via Nominatim
///
/// Service failures never reach the caller: a failed search yields no
/// suggestions and a failed reverse lookup yields no name.
#[derive(Clone)]
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"dyn GeocodingClient")
            .finish()
    }
}

impl GeocodingAdapter {
    /// Wrap an existing client
    pub fn new(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }

    /// Build an adapter over a Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn nominatim(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = NominatimGeocodingClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn search_by_text(&self, query: &str) -> Vec<PlaceCandidate> {
        match self.client.search(query).await {
            Ok(places) => {
                debug!(count = places.len(), "Search returned places");
                places
            },
            Err(e) => {
                warn!(%query, error = %e, retryable = e.is_retryable(), "Place search failed");
                Vec::new()
            },
        }
    }

    #[instrument(skip(self))]
    async fn reverse_lookup(&self, point: GeoPoint) -> Option<String> {
        match self.client.reverse(point).await {
            Ok(name) => Some(name),
            Err(GeocodingError::NotFound(reason)) => {
                debug!(%reason, "No address at point");
                None
            },
            Err(e) => {
                warn!(error = %e, "Reverse lookup failed");
                None
            },
        }
    }
}
