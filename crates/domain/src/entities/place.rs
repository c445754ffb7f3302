//! Geocoding candidate

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// A place returned by a forward or reverse geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Identifier assigned by the geocoding service
    pub place_id: u64,
    /// Location of the place
    pub position: GeoPoint,
    /// Human-readable name
    pub display_name: String,
}

impl PlaceCandidate {
    /// Create a candidate
    #[must_use]
    pub fn new(place_id: u64, position: GeoPoint, display_name: impl Into<String>) -> Self {
        Self {
            place_id,
            position,
            display_name: display_name.into(),
        }
    }
}
