//! Core error types for routemap.
//!
//! [`RouteMapError`] covers the failures that happen around URL building:
//! loading configuration, reading route tables, and looking up endpoints.
//! Failures of URL building itself are reported by `RouteBuildError` in
//! `routemap-urls`.

use thiserror::Error;

/// The primary error type for configuration and route-table handling.
#[derive(Error, Debug)]
pub enum RouteMapError {
    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The resolver is improperly configured (e.g. an unknown converter kind).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Route tables ─────────────────────────────────────────────────

    /// The requested endpoint or file was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for RouteMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, RouteMapError>`.
pub type RouteMapResult<T> = Result<T, RouteMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouteMapError::NotFound("events.display".into());
        assert_eq!(err.to_string(), "Not found: events.display");

        let err = RouteMapError::ImproperlyConfigured("unknown converter kind 'x'".into());
        assert!(err.to_string().starts_with("Improperly configured:"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RouteMapError = io_err.into();
        assert!(matches!(err, RouteMapError::IoError(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RouteMapError = json_err.into();
        assert!(matches!(err, RouteMapError::SerializationError(_)));
    }
}
