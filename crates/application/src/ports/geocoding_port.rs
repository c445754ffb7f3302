//! Geocoding port
//!
//! Free-text place search and reverse lookup. Implementations swallow
//! service failures: callers only ever see "no results".

use async_trait::async_trait;
use domain::{GeoPoint, PlaceCandidate};
#[cfg(test)]
use mockall::automock;

/// Port for forward and reverse geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Places matching `query`, best match first; empty on no match or failure
    async fn search_by_text(&self, query: &str) -> Vec<PlaceCandidate>;

    /// Display name of the place nearest to `point`; `None` on failure
    async fn reverse_lookup(&self, point: GeoPoint) -> Option<String>;
}
