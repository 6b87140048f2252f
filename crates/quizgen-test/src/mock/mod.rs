//! Mock implementations of the core provider traits.

mod completion;
mod embedding;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use completion::{MockCompletionProvider, PromptLog};
pub use embedding::MockEmbeddingProvider;
use quizgen_core::emb::EmbeddingService;
use quizgen_core::llm::CompletionService;
use quizgen_core::{Error, ErrorKind, Result};

/// Number of calls a mock has received, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Returns the number of calls so far.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Records a call and returns its zero-based index.
    fn record(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// When and how a mock fails.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Never,
    Always(ErrorKind),
    FirstN(usize, ErrorKind),
}

impl Failure {
    /// Checks the `call`-th invocation (zero-based).
    fn check(self, call: usize) -> Result<()> {
        match self {
            Self::Never => Ok(()),
            Self::Always(kind) => Err(mock_error(kind)),
            Self::FirstN(n, kind) if call < n => Err(mock_error(kind)),
            Self::FirstN(..) => Ok(()),
        }
    }
}

fn mock_error(kind: ErrorKind) -> Error {
    Error::new(kind).with_message("mock provider failure")
}

/// Creates an embedding service backed by a 64-dimensional mock.
pub fn mock_embedding_service() -> EmbeddingService {
    EmbeddingService::new(MockEmbeddingProvider::new(64))
}

/// Creates a completion service that always answers `answer`.
pub fn mock_completion_service(answer: &str) -> CompletionService {
    CompletionService::new(MockCompletionProvider::new(answer))
}
