//! Error types for quizgen-rig.

use std::fmt;

use quizgen_core::ErrorKind;

/// Result type alias for rig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during indexing, retrieval and generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A provider client could not be constructed.
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// The embedding service failed or returned unusable vectors.
    #[error("embedding error: {0}")]
    Embedding(#[source] quizgen_core::Error),

    /// The completion service failed or returned an empty answer.
    #[error("generation error: {0}")]
    Generation(#[source] quizgen_core::Error),

    /// The index cannot answer the query.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a retrieval error.
    pub fn retrieval(message: impl fmt::Display) -> Self {
        Self::Retrieval(message.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns the classification of the underlying service failure, if any.
    pub fn service_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Embedding(err) | Self::Generation(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.service_kind().is_some_and(ErrorKind::is_retryable)
    }
}
