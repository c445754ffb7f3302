//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Routing engine could not be built or driven
    #[error("Routing engine error: {0}")]
    Engine(String),

    /// The map surface has been disposed
    #[error("Map surface disposed")]
    SurfaceDisposed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_is_transparent() {
        let err: ApplicationError = DomainError::InvalidCoordinates("lat 91".to_string()).into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(err.to_string().contains("lat 91"));
    }

    #[test]
    fn test_configuration_message_names_section() {
        let err = ApplicationError::Configuration("routing: base_url is empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: routing: base_url is empty"
        );
    }
}
