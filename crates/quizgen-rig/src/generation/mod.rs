//! Quiz question generation grounded in retrieved document chunks.
//!
//! A [`QuestionGenerator`] retrieves the chunks most relevant to a
//! [`GenerationRequest`], renders them into a [`PromptTemplate`] and asks
//! the completion model for questions. The answer is returned as free text;
//! its shape is up to the model.

mod prompt;
mod request;

use jiff::Timestamp;
use quizgen_core::RetryConfig;
use quizgen_core::llm::CompletionService;
use uuid::Uuid;

pub use self::prompt::{DEFAULT_TEMPLATE, PromptTemplate, format_context};
pub use self::request::{GenerationRequest, GenerationResult, SourceRef};
use crate::rag::{RagService, VectorIndex};
use crate::{Error, Result};

/// Tracing target for question generation.
pub const TRACING_TARGET: &str = "quizgen_rig::generation";

/// Generates quiz questions with a completion model.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    completion: CompletionService,
    template: PromptTemplate,
    retry: RetryConfig,
}

impl QuestionGenerator {
    /// Creates a generator using the default prompt.
    pub fn new(completion: CompletionService, retry: RetryConfig) -> Self {
        Self {
            completion,
            template: PromptTemplate::default(),
            retry,
        }
    }

    /// Replaces the prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Returns the completion service.
    pub fn completion(&self) -> &CompletionService {
        &self.completion
    }

    /// Retrieves context from `index` and generates questions for `request`.
    pub async fn generate(
        &self,
        rag: &RagService,
        index: &VectorIndex,
        request: &GenerationRequest,
    ) -> Result<GenerationResult> {
        let retrieved = rag
            .search(index, &request.query, rag.config().max_results)
            .await?;
        if retrieved.is_empty() {
            return Err(Error::retrieval("no chunk matched the retrieval query"));
        }

        let context = format_context(&retrieved);
        let prompt = self.template.render(&context, &request.settings);

        tracing::debug!(
            target: TRACING_TARGET,
            chunks = retrieved.len(),
            context_chars = context.chars().count(),
            settings = %request.settings,
            "Sending generation prompt"
        );

        let answer = self
            .retry
            .retry("complete", || self.completion.complete(&prompt))
            .await
            .map_err(Error::Generation)?;

        if answer.trim().is_empty() {
            return Err(Error::Generation(
                quizgen_core::Error::external_error().with_message("model returned an empty answer"),
            ));
        }

        tracing::info!(
            target: TRACING_TARGET,
            provider = self.completion.provider_name(),
            model = self.completion.model_name(),
            answer_chars = answer.chars().count(),
            "Questions generated"
        );

        Ok(GenerationResult {
            id: Uuid::now_v7(),
            answer,
            settings: request.settings,
            sources: retrieved.iter().map(SourceRef::from).collect(),
            provider: self.completion.provider_name().to_owned(),
            model: self.completion.model_name().to_owned(),
            generated_at: Timestamp::now(),
        })
    }
}
