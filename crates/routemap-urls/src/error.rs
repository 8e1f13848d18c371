//! URL building errors.
//!
//! A [`RouteBuildError`] means the route table and the caller disagree. It is
//! a programming error, so the resolver never recovers from it by guessing
//! a URL.

use std::fmt;

use thiserror::Error;

use crate::params::Params;

/// What went wrong while building a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteBuildErrorKind {
    /// The route template (or one of its rules) is malformed, or the
    /// endpoint is not in the route map.
    Shape,
    /// No rule of the endpoint accepts the given parameters.
    NoSuitableRule,
    /// The selected rule could not serialize one of its dynamic values.
    Conversion,
}

impl fmt::Display for RouteBuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape => write!(f, "shape"),
            Self::NoSuitableRule => write!(f, "no suitable rule"),
            Self::Conversion => write!(f, "conversion"),
        }
    }
}

/// The error returned when a URL cannot be built.
///
/// Carries the endpoint and the offending parameters for diagnostics.
///
/// # Examples
///
/// ```
/// use routemap_urls::error::{RouteBuildError, RouteBuildErrorKind};
///
/// let err = RouteBuildError::no_suitable_rule("events.display");
/// assert_eq!(err.kind, RouteBuildErrorKind::NoSuitableRule);
/// assert!(err.to_string().contains("events.display"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RouteBuildError {
    /// The failure category.
    pub kind: RouteBuildErrorKind,
    /// A human-readable description.
    pub message: String,
    /// The endpoint being built, when known.
    pub endpoint: Option<String>,
    /// The parameters the caller supplied, when known.
    pub params: Option<Params>,
}

impl RouteBuildError {
    /// Creates an error of the given kind.
    pub fn new(kind: RouteBuildErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            endpoint: None,
            params: None,
        }
    }

    /// A malformed template or rule.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(RouteBuildErrorKind::Shape, message)
    }

    /// No rule accepted the parameters of `endpoint`.
    pub fn no_suitable_rule(endpoint: &str) -> Self {
        Self::new(
            RouteBuildErrorKind::NoSuitableRule,
            format!("Could not build an URL for endpoint '{endpoint}': no rule matches the given parameters"),
        )
        .with_endpoint(endpoint)
    }

    /// A dynamic value could not be converted.
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(RouteBuildErrorKind::Conversion, message)
    }

    /// Attaches the endpoint name unless one is already set.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        if self.endpoint.is_none() {
            self.endpoint = Some(endpoint.into());
        }
        self
    }

    /// Attaches the caller's parameters.
    #[must_use]
    pub fn with_params(mut self, params: &Params) -> Self {
        self.params = Some(params.clone());
        self
    }

    /// Returns a JSON description of the error, for logs and crash reports.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": self.kind.to_string(),
            "message": self.message,
            "endpoint": self.endpoint,
            "params": self.params.as_ref().map(Params::to_json),
        })
    }
}

/// A convenience type alias for `Result<T, RouteBuildError>`.
pub type RouteBuildResult<T> = Result<T, RouteBuildError>;
