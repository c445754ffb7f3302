//! Geographic point value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A geographic point with latitude and longitude
///
/// Equality is by value: two points with the same coordinates are the same
/// point, which is what route-request deduplication relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoPoint {
    /// Create a new point with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates(format!(
                "{latitude},{longitude} (latitude must be -90 to 90, longitude must be -180 to 180)"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a point without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a point from the decimal strings returned by geocoding services
    pub fn from_decimal_strings(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        let lat: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidCoordinates(format!("latitude '{latitude}'")))?;
        let lon: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidCoordinates(format!("longitude '{longitude}'")))?;
        Self::new(lat, lon)
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored)
impl FromStr for GeoPoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| DomainError::InvalidCoordinates(format!("'{s}' is not 'lat,lon'")))?;
        Self::from_decimal_strings(lat, lon)
    }
}
