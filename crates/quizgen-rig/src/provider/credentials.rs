//! Shared credential types for AI providers.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{Error, Result};

/// API key credentials for AI providers.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKeyCredentials {
    /// API key.
    pub api_key: String,
}

impl ApiKeyCredentials {
    /// Wraps an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Credentials for one of the supported hosted providers.
#[derive(Debug, Clone, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "provider", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Credentials {
    /// Groq credentials (completion only).
    Groq(ApiKeyCredentials),
    /// OpenAI credentials.
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi(ApiKeyCredentials),
    /// Google Gemini credentials.
    Gemini(ApiKeyCredentials),
}

impl Credentials {
    /// Returns the provider name.
    pub fn provider(&self) -> &'static str {
        self.into()
    }

    /// Returns the API key, rejecting blank keys.
    pub fn api_key(&self) -> Result<&str> {
        let key = match self {
            Self::Groq(c) | Self::OpenAi(c) | Self::Gemini(c) => c.api_key.trim(),
        };
        if key.is_empty() {
            return Err(Error::provider(self.provider(), "API key is empty"));
        }
        Ok(key)
    }
}
