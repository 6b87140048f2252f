//! Rig embedding models behind the core [`EmbeddingProvider`] trait.

use std::sync::Arc;

use quizgen_core::emb::{Embedding, EmbeddingProvider};
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::{gemini, openai};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::classify::classify_provider_error;
use super::credentials::Credentials;
use crate::{Error, Result};

/// Hosted embedding services.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum EmbeddingBackend {
    /// Google Gemini embeddings.
    #[default]
    Gemini,
    /// OpenAI embeddings.
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    #[cfg_attr(feature = "config", value(name = "openai"))]
    OpenAi,
}

impl EmbeddingBackend {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "embedding-001",
            Self::OpenAi => "text-embedding-3-small",
        }
    }

    /// Vector size of [`default_model`](Self::default_model).
    pub fn default_dimensions(self) -> usize {
        match self {
            Self::Gemini => 768,
            Self::OpenAi => 1536,
        }
    }
}

/// Which embedding model to use and how wide its vectors are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingModelConfig {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub dimensions: usize,
}

impl EmbeddingModelConfig {
    /// Uses the backend's default model.
    pub fn new(backend: EmbeddingBackend) -> Self {
        Self {
            backend,
            model: backend.default_model().to_owned(),
            dimensions: backend.default_dimensions(),
        }
    }

    /// Overrides the model and its dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }
}

impl Default for EmbeddingModelConfig {
    fn default() -> Self {
        Self::new(EmbeddingBackend::default())
    }
}

/// Embedding provider that wraps a rig embedding model.
///
/// This is a cheaply cloneable wrapper around an `Arc`.
#[derive(Clone)]
pub struct RigEmbeddingProvider(Arc<EmbeddingModelInner>);

enum EmbeddingModelInner {
    OpenAi {
        model: openai::EmbeddingModel,
        model_name: String,
        ndims: usize,
    },
    Gemini {
        model: gemini::embedding::EmbeddingModel,
        model_name: String,
        ndims: usize,
    },
}

impl RigEmbeddingProvider {
    /// Builds a client for `config` using matching `credentials`.
    pub fn connect(config: EmbeddingModelConfig, credentials: Credentials) -> Result<Self> {
        if config.dimensions == 0 {
            return Err(Error::config("embedding dimensions must be greater than zero"));
        }

        let api_key = credentials.api_key()?;
        let inner = match (config.backend, &credentials) {
            (EmbeddingBackend::OpenAi, Credentials::OpenAi(_)) => {
                let client = openai::Client::new(api_key)
                    .map_err(|e| Error::provider("openai", e.to_string()))?;
                EmbeddingModelInner::OpenAi {
                    model: client.embedding_model_with_ndims(&config.model, config.dimensions),
                    model_name: config.model,
                    ndims: config.dimensions,
                }
            }
            (EmbeddingBackend::Gemini, Credentials::Gemini(_)) => {
                let client = gemini::Client::new(api_key)
                    .map_err(|e| Error::provider("gemini", e.to_string()))?;
                EmbeddingModelInner::Gemini {
                    model: client.embedding_model_with_ndims(&config.model, config.dimensions),
                    model_name: config.model,
                    ndims: config.dimensions,
                }
            }
            (backend, credentials) => {
                return Err(Error::config(format!(
                    "{backend} embeddings cannot use {} credentials",
                    credentials.provider()
                )));
            }
        };

        tracing::debug!(
            target: super::TRACING_TARGET,
            provider = config.backend.as_ref(),
            "Created embedding provider"
        );

        Ok(Self(Arc::new(inner)))
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for RigEmbeddingProvider {
    fn provider_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingModelInner::OpenAi { .. } => "openai",
            EmbeddingModelInner::Gemini { .. } => "gemini",
        }
    }

    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingModelInner::OpenAi { model_name, .. } => model_name,
            EmbeddingModelInner::Gemini { model_name, .. } => model_name,
        }
    }

    fn ndims(&self) -> usize {
        match self.0.as_ref() {
            EmbeddingModelInner::OpenAi { ndims, .. } => *ndims,
            EmbeddingModelInner::Gemini { ndims, .. } => *ndims,
        }
    }

    async fn embed_texts(&self, texts: &[String]) -> quizgen_core::Result<Vec<Embedding>> {
        let texts = texts.to_vec();
        let result = match self.0.as_ref() {
            EmbeddingModelInner::OpenAi { model, .. } => model.embed_texts(texts).await,
            EmbeddingModelInner::Gemini { model, .. } => model.embed_texts(texts).await,
        };

        result
            .map(|embeddings| {
                embeddings
                    .into_iter()
                    .map(|embedding| Embedding::new(embedding.vec))
                    .collect()
            })
            .map_err(|e| classify_provider_error(self.provider_name(), e))
    }
}

impl std::fmt::Debug for RigEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigEmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("ndims", &self.ndims())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ApiKeyCredentials;

    #[test]
    fn default_backend_is_gemini_embedding_001() {
        let config = EmbeddingModelConfig::default();
        assert_eq!(config.backend, EmbeddingBackend::Gemini);
        assert_eq!(config.model, "embedding-001");
        assert_eq!(config.dimensions, 768);
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!("openai".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::OpenAi);
        assert_eq!(EmbeddingBackend::Gemini.to_string(), "gemini");
    }

    #[test]
    fn mismatched_credentials_are_rejected() {
        let err = RigEmbeddingProvider::connect(
            EmbeddingModelConfig::new(EmbeddingBackend::Gemini),
            Credentials::Groq(ApiKeyCredentials::new("gsk-test")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = EmbeddingModelConfig::default().with_model("embedding-001", 0);
        let err = RigEmbeddingProvider::connect(
            config,
            Credentials::Gemini(ApiKeyCredentials::new("key")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
