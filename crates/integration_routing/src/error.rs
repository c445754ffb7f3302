//! Routing error types

use thiserror::Error;

/// Errors that can occur while computing a route
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the routing service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the routing response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The service answered with a non-`Ok` code (e.g. `NoRoute`)
    #[error("Routing service error {code}: {message}")]
    Service {
        /// OSRM response code
        code: String,
        /// Message accompanying the code
        message: String,
    },

    /// Fewer than two points were given
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Route geometry could not be decoded
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::RateLimitExceeded
                | Self::Timeout { .. }
        )
    }

    /// Returns true if the service found no route between the points
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        matches!(self, Self::Service { code, .. } if code == "NoRoute" || code == "NoSegment")
    }
}
