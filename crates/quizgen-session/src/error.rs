use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::state::SessionPhase;

/// Type alias for session results.
pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Which stage produced nothing to index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentStage {
    /// The PDF contained no extractable text.
    Text,
    /// Splitting the text produced no chunks.
    Chunks,
}

/// Errors reported by session actions.
///
/// None of them is fatal: the session stays usable after any of these.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The PDF could not be parsed or read.
    #[error("could not extract text from the PDF: {0}")]
    Extraction(#[source] quizgen_pdf::Error),

    /// The embedding service failed while building or querying the index.
    #[error("embedding service failed: {0}")]
    EmbeddingService(#[source] quizgen_rig::Error),

    /// The language model failed or returned nothing.
    #[error("question generation failed: {0}")]
    GenerationService(#[source] quizgen_rig::Error),

    /// The document has nothing to index.
    #[error("the document has no usable content ({stage} is empty)")]
    EmptyContent {
        /// Stage that came out empty.
        stage: ContentStage,
    },

    /// The report could not be written.
    #[error("could not export the questions: {0}")]
    Export(#[source] quizgen_pdf::Error),

    /// A file given to `upload` could not be read.
    #[error("could not read {path}: {source}")]
    Upload {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `process` was called without a staged upload.
    #[error("no document has been uploaded")]
    NoDocument,

    /// `generate` was called before a document was processed.
    #[error("no processed document (session is {phase})")]
    NotReady {
        /// Phase the session was in.
        phase: SessionPhase,
    },

    /// `export` was called before anything was generated.
    #[error("there are no generated questions to export")]
    NothingToExport,

    /// The action was cancelled before it finished.
    #[error("the action was cancelled")]
    Cancelled,

    /// A blocking task panicked or was aborted.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SessionError {
    /// Returns true if repeating the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EmbeddingService(err) | Self::GenerationService(err) => err.is_retryable(),
            Self::Cancelled => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = SessionError::EmptyContent {
            stage: ContentStage::Text,
        };
        assert_eq!(
            err.to_string(),
            "the document has no usable content (text is empty)"
        );

        let err = SessionError::NotReady {
            phase: SessionPhase::Idle,
        };
        assert_eq!(err.to_string(), "no processed document (session is idle)");
    }

    #[test]
    fn transient_service_errors_are_retryable() {
        let transient = quizgen_rig::Error::Generation(quizgen_core::Error::rate_limited());
        assert!(SessionError::GenerationService(transient).is_retryable());

        let auth = quizgen_rig::Error::Embedding(quizgen_core::Error::authentication());
        assert!(!SessionError::EmbeddingService(auth).is_retryable());
        assert!(!SessionError::NothingToExport.is_retryable());
    }
}
