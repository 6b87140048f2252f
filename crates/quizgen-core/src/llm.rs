//! Completion provider abstraction.

use std::fmt;
use std::sync::Arc;

use crate::Result;

/// Tracing target for completion operations.
pub const TRACING_TARGET: &str = "quizgen_core::llm";

/// Core trait for hosted language models: prompt in, text out.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name (e.g. "groq").
    fn provider_name(&self) -> &str;

    /// Returns the model identifier.
    fn model_name(&self) -> &str;

    /// Sends a single-turn prompt and returns the text of the reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Shared handle to a completion provider.
#[derive(Clone)]
pub struct CompletionService {
    inner: Arc<dyn CompletionProvider>,
}

impl CompletionService {
    /// Wraps a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: CompletionProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    /// Returns the model identifier.
    pub fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    /// Sends a single-turn prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::trace!(
            target: TRACING_TARGET,
            provider = self.provider_name(),
            prompt_chars = prompt.len(),
            "Sending completion"
        );
        self.inner.complete(prompt).await
    }
}

impl fmt::Debug for CompletionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionService")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}
