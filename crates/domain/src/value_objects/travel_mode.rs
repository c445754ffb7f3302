//! Travel mode value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// How the route is travelled
///
/// The routing engine binds its profile when it is constructed, so a change
/// of mode always means a new engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// By car
    #[default]
    Driving,
    /// On foot
    Walking,
    /// By bicycle
    Cycling,
}

impl TravelMode {
    /// All supported modes
    pub const ALL: [Self; 3] = [Self::Driving, Self::Walking, Self::Cycling];

    /// Engine profile name (`driving`, `walking`, `cycling`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }

    /// Profile segment used on the wire by OSRM-compatible routing services
    #[must_use]
    pub const fn service_profile(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "foot",
            Self::Cycling => "bicycle",
        }
    }

    /// Whether fuel cost and rush-hour adjustment apply
    #[must_use]
    pub const fn is_driving(&self) -> bool {
        matches!(self, Self::Driving)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(Self::Driving),
            "walking" | "walk" | "foot" => Ok(Self::Walking),
            "cycling" | "cycle" | "bicycle" | "bike" => Ok(Self::Cycling),
            other => Err(DomainError::InvalidTravelMode(other.to_string())),
        }
    }
}
