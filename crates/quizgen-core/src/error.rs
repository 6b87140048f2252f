//! Common error type definitions.

use std::time::Duration;

use strum::{AsRefStr, Display, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors returned by external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// Network-related error occurred.
    NetworkError,
    /// Authentication failed (missing or rejected credentials).
    Authentication,
    /// Authorization failed.
    Authorization,
    /// Rate limit or quota exceeded.
    RateLimited,
    /// Service temporarily unavailable.
    ServiceUnavailable,
    /// Internal error.
    InternalError,
    /// External service error.
    ExternalError,
    /// Configuration error.
    Configuration,
    /// Timeout occurred.
    Timeout,
    /// Serialization/deserialization error.
    Serialization,
    /// Operation was cancelled by the caller.
    Cancelled,
    /// Unknown error occurred.
    Unknown,
}

impl ErrorKind {
    /// Returns true if a failure of this kind is transient.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServiceUnavailable | Self::Timeout
        )
    }

    /// Returns a suggested minimum delay before retrying.
    pub fn retry_delay(self) -> Option<Duration> {
        match self {
            Self::RateLimited => Some(Duration::from_secs(2)),
            Self::ServiceUnavailable => Some(Duration::from_secs(1)),
            Self::NetworkError | Self::Timeout => Some(Duration::from_millis(500)),
            _ => None,
        }
    }
}

/// A structured error type for quizgen operations.
#[derive(Debug, Error)]
#[error("{kind}{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new rate limited error.
    pub fn rate_limited() -> Self {
        Self::new(ErrorKind::RateLimited)
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable() -> Self {
        Self::new(ErrorKind::ServiceUnavailable)
    }

    /// Creates a new internal error.
    pub fn internal_error() -> Self {
        Self::new(ErrorKind::InternalError)
    }

    /// Creates a new external error.
    pub fn external_error() -> Self {
        Self::new(ErrorKind::ExternalError)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns true if the failed operation may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::rate_limited().with_message("quota exceeded");
        assert_eq!(err.to_string(), "rate_limited: quota exceeded");
        assert_eq!(Error::timeout().to_string(), "timeout");
    }

    #[test]
    fn transient_kinds_are_retryable() {
        assert!(Error::network_error().is_retryable());
        assert!(Error::rate_limited().is_retryable());
        assert!(Error::timeout().is_retryable());
        assert!(!Error::authentication().is_retryable());
        assert!(!Error::invalid_input().is_retryable());
        assert!(!Error::cancelled().is_retryable());
    }

    #[test]
    fn kind_str_is_snake_case() {
        assert_eq!(Error::service_unavailable().kind_str(), "service_unavailable");
    }
}
