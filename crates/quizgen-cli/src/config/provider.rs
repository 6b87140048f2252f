//! Provider configuration and construction.

use std::fmt;

use anyhow::Context;
use clap::Args;
use quizgen_core::emb::EmbeddingService;
use quizgen_core::llm::CompletionService;
use quizgen_rig::provider::{
    ApiKeyCredentials, CompletionBackend, CompletionModelConfig, Credentials, EmbeddingBackend,
    EmbeddingModelConfig, RigCompletionProvider, RigEmbeddingProvider,
};

use crate::TRACING_TARGET_CONFIG;

/// Which hosted services to call and how to authenticate.
#[derive(Clone, Args)]
pub struct ProviderConfig {
    /// Embedding service.
    #[arg(long, env = "QUIZGEN_EMBEDDING_BACKEND", value_enum, default_value = "gemini")]
    pub embedding_backend: EmbeddingBackend,

    /// Embedding model; the backend default when omitted.
    #[arg(long, env = "QUIZGEN_EMBEDDING_MODEL", requires = "embedding_dimensions")]
    pub embedding_model: Option<String>,

    /// Vector size of `--embedding-model`.
    #[arg(long, env = "QUIZGEN_EMBEDDING_DIMENSIONS")]
    pub embedding_dimensions: Option<usize>,

    /// Completion service.
    #[arg(long, env = "QUIZGEN_COMPLETION_BACKEND", value_enum, default_value = "groq")]
    pub completion_backend: CompletionBackend,

    /// Completion model; the backend default when omitted.
    #[arg(long, env = "QUIZGEN_COMPLETION_MODEL")]
    pub completion_model: Option<String>,

    /// Groq API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Google AI (Gemini) API key.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,
}

impl ProviderConfig {
    /// Checks that every selected backend has a key.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.embedding_credentials()?;
        self.completion_credentials()?;
        Ok(())
    }

    /// Resolved embedding model settings.
    pub fn embedding_model_config(&self) -> EmbeddingModelConfig {
        let config = EmbeddingModelConfig::new(self.embedding_backend);
        match (&self.embedding_model, self.embedding_dimensions) {
            (Some(model), Some(dimensions)) => config.with_model(model, dimensions),
            _ => config,
        }
    }

    /// Resolved completion model settings.
    pub fn completion_model_config(&self) -> CompletionModelConfig {
        let config = CompletionModelConfig::new(self.completion_backend);
        match &self.completion_model {
            Some(model) => config.with_model(model),
            None => config,
        }
    }

    /// Connects the configured embedding model.
    pub fn create_embedding_service(&self) -> anyhow::Result<EmbeddingService> {
        let provider =
            RigEmbeddingProvider::connect(self.embedding_model_config(), self.embedding_credentials()?)
                .context("failed to create embedding client")?;
        Ok(EmbeddingService::new(provider))
    }

    /// Connects the configured completion model.
    pub fn create_completion_service(&self) -> anyhow::Result<CompletionService> {
        let provider = RigCompletionProvider::connect(
            self.completion_model_config(),
            self.completion_credentials()?,
        )
        .context("failed to create completion client")?;
        Ok(CompletionService::new(provider))
    }

    fn embedding_credentials(&self) -> anyhow::Result<Credentials> {
        match self.embedding_backend {
            EmbeddingBackend::Gemini => {
                key(&self.google_api_key, "GOOGLE_API_KEY").map(Credentials::Gemini)
            }
            EmbeddingBackend::OpenAi => {
                key(&self.openai_api_key, "OPENAI_API_KEY").map(Credentials::OpenAi)
            }
        }
    }

    fn completion_credentials(&self) -> anyhow::Result<Credentials> {
        match self.completion_backend {
            CompletionBackend::Groq => key(&self.groq_api_key, "GROQ_API_KEY").map(Credentials::Groq),
            CompletionBackend::OpenAi => {
                key(&self.openai_api_key, "OPENAI_API_KEY").map(Credentials::OpenAi)
            }
            CompletionBackend::Gemini => {
                key(&self.google_api_key, "GOOGLE_API_KEY").map(Credentials::Gemini)
            }
        }
    }

    /// Logs the provider selection.
    pub fn log(&self) {
        let embedding = self.embedding_model_config();
        let completion = self.completion_model_config();
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            embedding_backend = %embedding.backend,
            embedding_model = %embedding.model,
            embedding_dimensions = embedding.dimensions,
            completion_backend = %completion.backend,
            completion_model = %completion.model,
            "Provider configuration"
        );
    }
}

fn key(value: &Option<String>, variable: &str) -> anyhow::Result<ApiKeyCredentials> {
    match value.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(ApiKeyCredentials::new(key)),
        _ => anyhow::bail!("{variable} is not set"),
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProviderConfig")
            .field("embedding_backend", &self.embedding_backend)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .field("completion_backend", &self.completion_backend)
            .field("completion_model", &self.completion_model)
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("google_api_key", &redact(&self.google_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[clap(flatten)]
        provider: ProviderConfig,
    }

    fn parse(args: &[&str]) -> ProviderConfig {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().provider
    }

    #[test]
    fn missing_key_for_selected_backend_fails() {
        let config = parse(&[
            "--embedding-backend",
            "openai",
            "--openai-api-key",
            "",
            "--groq-api-key",
            "g",
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn custom_embedding_model_needs_dimensions() {
        assert!(
            Harness::try_parse_from(["test", "--embedding-model", "text-embedding-3-large"])
                .is_err()
        );

        let config = parse(&[
            "--embedding-model",
            "text-embedding-3-large",
            "--embedding-dimensions",
            "3072",
        ]);
        let model = config.embedding_model_config();
        assert_eq!(model.model, "text-embedding-3-large");
        assert_eq!(model.dimensions, 3072);
    }

    #[test]
    fn debug_output_hides_keys() {
        let config = parse(&["--groq-api-key", "gsk_secret"]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
