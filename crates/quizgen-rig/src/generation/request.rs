//! Generation request and result types.

use jiff::Timestamp;
use quizgen_core::quiz::QuizSettings;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rag::RetrievedChunk;

/// What to generate and which part of the document to ground it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Question type, complexity and count.
    pub settings: QuizSettings,
    /// Retrieval query used to pick context chunks.
    pub query: String,
}

impl GenerationRequest {
    /// Creates a request with an explicit retrieval query.
    pub fn new(settings: QuizSettings, query: impl Into<String>) -> Self {
        Self {
            settings,
            query: query.into(),
        }
    }

    /// Builds the request for a whole document.
    ///
    /// A non-blank `focus` becomes the query. Otherwise the first
    /// `max_query_chars` characters of the document stand in for it, which
    /// steers retrieval towards the opening material.
    pub fn for_document(
        settings: QuizSettings,
        document: &str,
        focus: Option<&str>,
        max_query_chars: usize,
    ) -> Self {
        let query = match focus.map(str::trim) {
            Some(focus) if !focus.is_empty() => focus.to_owned(),
            _ => leading_excerpt(document, max_query_chars).to_owned(),
        };
        Self::new(settings, query)
    }
}

/// Returns at most `max_chars` characters from the start of `text`, trimmed.
fn leading_excerpt(text: &str, max_chars: usize) -> &str {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(idx, _)| idx);
    text[..end].trim_end()
}

/// A chunk that contributed to the prompt context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Index of the chunk within the document.
    pub chunk_index: u32,
    /// Cosine similarity to the query.
    pub score: f64,
}

impl From<&RetrievedChunk> for SourceRef {
    fn from(chunk: &RetrievedChunk) -> Self {
        Self {
            chunk_index: chunk.chunk_index,
            score: chunk.score,
        }
    }
}

/// Raw model output together with what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Unique identifier of this generation.
    pub id: Uuid,
    /// Model answer, unparsed.
    pub answer: String,
    /// Settings the answer was requested with.
    pub settings: QuizSettings,
    /// Context chunks, in the order they were given to the model.
    pub sources: Vec<SourceRef>,
    /// Completion provider name.
    pub provider: String,
    /// Completion model name.
    pub model: String,
    /// When the answer was received.
    pub generated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wins_over_document_text() {
        let request = GenerationRequest::for_document(
            QuizSettings::default(),
            "Long document text",
            Some("  mitochondria "),
            100,
        );
        assert_eq!(request.query, "mitochondria");
    }

    #[test]
    fn blank_focus_falls_back_to_excerpt() {
        let request =
            GenerationRequest::for_document(QuizSettings::default(), "\n  héllo world", Some(" "), 5);
        assert_eq!(request.query, "héllo");

        let request =
            GenerationRequest::for_document(QuizSettings::default(), "short", None, 1000);
        assert_eq!(request.query, "short");
    }
}
