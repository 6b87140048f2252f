//! Rig-backed implementations of the quizgen provider traits.
//!
//! Each provider owns a rig client for one hosted service and converts rig
//! errors into classified [`quizgen_core::Error`]s.

mod classify;
mod completion;
mod credentials;
mod embedding;

pub use self::classify::classify_provider_error;
pub use self::completion::{CompletionBackend, CompletionModelConfig, RigCompletionProvider};
pub use self::credentials::{ApiKeyCredentials, Credentials};
pub use self::embedding::{EmbeddingBackend, EmbeddingModelConfig, RigEmbeddingProvider};

/// Tracing target for provider construction and calls.
pub const TRACING_TARGET: &str = "quizgen_rig::provider";
