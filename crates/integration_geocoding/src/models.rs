//! Raw Nominatim response models

use domain::{GeoPoint, PlaceCandidate};
use serde::Deserialize;
use tracing::warn;

/// One entry of a `jsonv2` search or reverse response
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    #[serde(default)]
    pub place_id: u64,
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

/// Error body Nominatim returns for points it cannot resolve
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimErrorBody {
    pub error: String,
}

impl NominatimPlace {
    /// Convert into a domain candidate, skipping entries with unusable coordinates
    pub(crate) fn into_candidate(self) -> Option<PlaceCandidate> {
        match GeoPoint::from_decimal_strings(&self.lat, &self.lon) {
            Ok(position) => Some(PlaceCandidate::new(
                self.place_id,
                position,
                self.display_name.unwrap_or_default(),
            )),
            Err(e) => {
                warn!(place_id = self.place_id, error = %e, "Skipping place with invalid coordinates");
                None
            },
        }
    }
}
