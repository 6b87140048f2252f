//! Rig completion models behind the core [`CompletionProvider`] trait.

use std::sync::Arc;

use quizgen_core::llm::CompletionProvider;
use rig::completion::{AssistantContent, CompletionError, CompletionModel as RigCompletionModel};
use rig::one_or_many::OneOrMany;
use rig::prelude::CompletionClient;
use rig::providers::{gemini, groq, openai};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::classify::classify_provider_error;
use super::credentials::Credentials;
use crate::{Error, Result};

/// Hosted completion services.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum CompletionBackend {
    /// Groq-hosted open models.
    #[default]
    Groq,
    /// OpenAI chat completions.
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    #[cfg_attr(feature = "config", value(name = "openai"))]
    OpenAi,
    /// Google Gemini.
    Gemini,
}

impl CompletionBackend {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Groq => "llama-3.3-70b-versatile",
            Self::OpenAi => "gpt-4o-mini",
            Self::Gemini => "gemini-2.0-flash",
        }
    }
}

/// Which completion model to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionModelConfig {
    pub backend: CompletionBackend,
    pub model: String,
}

impl CompletionModelConfig {
    /// Uses the backend's default model.
    pub fn new(backend: CompletionBackend) -> Self {
        Self {
            backend,
            model: backend.default_model().to_owned(),
        }
    }

    /// Overrides the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for CompletionModelConfig {
    fn default() -> Self {
        Self::new(CompletionBackend::default())
    }
}

/// Completion provider that wraps a rig completion model.
///
/// This is a cheaply cloneable wrapper around an `Arc`.
#[derive(Clone)]
pub struct RigCompletionProvider(Arc<CompletionModelInner>);

enum CompletionModelInner {
    Groq {
        model: groq::CompletionModel,
        model_name: String,
    },
    OpenAi {
        model: openai::CompletionModel,
        model_name: String,
    },
    Gemini {
        model: gemini::completion::CompletionModel,
        model_name: String,
    },
}

impl RigCompletionProvider {
    /// Builds a client for `config` using matching `credentials`.
    pub fn connect(config: CompletionModelConfig, credentials: Credentials) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(Error::config("completion model name is empty"));
        }

        let api_key = credentials.api_key()?;
        let inner = match (config.backend, &credentials) {
            (CompletionBackend::Groq, Credentials::Groq(_)) => {
                let client = groq::Client::new(api_key)
                    .map_err(|e| Error::provider("groq", e.to_string()))?;
                CompletionModelInner::Groq {
                    model: client.completion_model(&config.model),
                    model_name: config.model,
                }
            }
            (CompletionBackend::OpenAi, Credentials::OpenAi(_)) => {
                let client = openai::Client::new(api_key)
                    .map_err(|e| Error::provider("openai", e.to_string()))?
                    .completions_api();
                CompletionModelInner::OpenAi {
                    model: client.completion_model(&config.model),
                    model_name: config.model,
                }
            }
            (CompletionBackend::Gemini, Credentials::Gemini(_)) => {
                let client = gemini::Client::new(api_key)
                    .map_err(|e| Error::provider("gemini", e.to_string()))?;
                CompletionModelInner::Gemini {
                    model: client.completion_model(&config.model),
                    model_name: config.model,
                }
            }
            (backend, credentials) => {
                return Err(Error::config(format!(
                    "{backend} completions cannot use {} credentials",
                    credentials.provider()
                )));
            }
        };

        tracing::debug!(
            target: super::TRACING_TARGET,
            provider = config.backend.as_ref(),
            "Created completion provider"
        );

        Ok(Self(Arc::new(inner)))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for RigCompletionProvider {
    fn provider_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionModelInner::Groq { .. } => "groq",
            CompletionModelInner::OpenAi { .. } => "openai",
            CompletionModelInner::Gemini { .. } => "gemini",
        }
    }

    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionModelInner::Groq { model_name, .. } => model_name,
            CompletionModelInner::OpenAi { model_name, .. } => model_name,
            CompletionModelInner::Gemini { model_name, .. } => model_name,
        }
    }

    async fn complete(&self, prompt: &str) -> quizgen_core::Result<String> {
        let map_err = |e: CompletionError| classify_provider_error(self.provider_name(), e);

        match self.0.as_ref() {
            CompletionModelInner::Groq { model, .. } => model
                .completion_request(prompt)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            CompletionModelInner::OpenAi { model, .. } => model
                .completion_request(prompt)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            CompletionModelInner::Gemini { model, .. } => model
                .completion_request(prompt)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
        }
    }
}

/// Extracts text content from assistant content choices.
fn extract_text_content(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

impl std::fmt::Debug for RigCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigCompletionProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ApiKeyCredentials;

    #[test]
    fn default_backend_is_groq() {
        let config = CompletionModelConfig::default();
        assert_eq!(config.backend, CompletionBackend::Groq);
        assert_eq!(config.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn model_can_be_overridden() {
        let config = CompletionModelConfig::new(CompletionBackend::OpenAi).with_model("gpt-4o");
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn mismatched_credentials_are_rejected() {
        let err = RigCompletionProvider::connect(
            CompletionModelConfig::new(CompletionBackend::Groq),
            Credentials::Gemini(ApiKeyCredentials::new("key")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn empty_api_key_is_a_provider_error() {
        let err = RigCompletionProvider::connect(
            CompletionModelConfig::default(),
            Credentials::Groq(ApiKeyCredentials::new("")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }
}
