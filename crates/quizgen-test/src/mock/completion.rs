//! Mock completion provider for testing.

use std::sync::{Arc, Mutex, PoisonError};

use quizgen_core::llm::CompletionProvider;
use quizgen_core::{ErrorKind, Result};

use super::{CallCounter, Failure};

/// Prompts received by a [`MockCompletionProvider`], shared between clones.
#[derive(Debug, Clone, Default)]
pub struct PromptLog(Arc<Mutex<Vec<String>>>);

impl PromptLog {
    /// Returns every prompt received so far, oldest first.
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the most recent prompt.
    pub fn last(&self) -> Option<String> {
        self.all().pop()
    }

    fn push(&self, prompt: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_owned());
    }
}

/// Mock completion provider for testing.
///
/// Answers every prompt with the same canned text.
#[derive(Debug, Clone)]
pub struct MockCompletionProvider {
    answer: String,
    failure: Failure,
    calls: CallCounter,
    prompts: PromptLog,
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new("1. What is the main idea of the document?")
    }
}

impl MockCompletionProvider {
    /// Creates a provider answering `answer`.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            failure: Failure::Never,
            calls: CallCounter::default(),
            prompts: PromptLog::default(),
        }
    }

    /// Fails every call with `kind`.
    pub fn failing(mut self, kind: ErrorKind) -> Self {
        self.failure = Failure::Always(kind);
        self
    }

    /// Fails the first `times` calls with `kind`, then succeeds.
    pub fn failing_times(mut self, times: usize, kind: ErrorKind) -> Self {
        self.failure = Failure::FirstN(times, kind);
        self
    }

    /// Returns a handle to the call counter.
    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    /// Returns a handle to the prompt log.
    pub fn prompts(&self) -> PromptLog {
        self.prompts.clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-completion"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt);
        self.failure.check(self.calls.record())?;
        Ok(self.answer.clone())
    }
}
