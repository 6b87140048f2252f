//! Semantic search over a [`VectorIndex`].

use quizgen_core::RetryConfig;
use quizgen_core::emb::EmbeddingService;

use super::store::{RetrievedChunk, VectorIndex};
use crate::{Error, Result, TRACING_TARGET};

/// Semantic search service for document chunks.
///
/// The service is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SearchService {
    embedding: EmbeddingService,
    retry: RetryConfig,
    min_score: Option<f64>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(embedding: EmbeddingService, retry: RetryConfig) -> Self {
        Self {
            embedding,
            retry,
            min_score: None,
        }
    }

    /// Sets the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Embeds `query` and returns the `limit` most similar chunks of `index`.
    ///
    /// The query is embedded with the same model the index was built with;
    /// an index from a different model cannot be searched.
    pub async fn search(
        &self,
        index: &VectorIndex,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RetrievedChunk>> {
        if index.model_name() != self.embedding.model_name() {
            return Err(Error::retrieval(format!(
                "index was built with {}, search uses {}",
                index.model_name(),
                self.embedding.model_name()
            )));
        }

        let embedding = self
            .retry
            .retry("embed_query", || self.embedding.embed_text(query))
            .await
            .map_err(Error::Embedding)?;

        let results = index.top_k(&embedding, limit as usize, self.min_score)?;

        tracing::debug!(
            target: TRACING_TARGET,
            index_id = %index.id(),
            limit,
            results = results.len(),
            top_score = results.first().map(|r| r.score),
            "Searched vector index"
        );

        Ok(results)
    }
}
