//! RAG (Retrieval-Augmented Generation) module.
//!
//! Provides document indexing and semantic search over document chunks.
//!
//! # Modules
//!
//! - [`indexer`] - Batch embedding of document chunks
//! - [`search`] - Semantic similarity search
//! - [`splitter`] - Text splitting for chunking documents
//!
//! # Example
//!
//! ```ignore
//! use quizgen_rig::rag::{RagConfig, RagService};
//!
//! let rag = RagService::new(embedding, RagConfig::default(), RetryConfig::default())?;
//!
//! let chunks = rag.split_text(&text);
//! let index = rag.index(chunks).await?;
//! let context = rag.search(&index, "cell biology", 4).await?;
//! ```

mod config;
pub mod indexer;
pub mod search;
pub mod splitter;
mod store;

use std::sync::Arc;

use quizgen_core::RetryConfig;
use quizgen_core::emb::EmbeddingService;

pub use self::config::RagConfig;
pub use self::indexer::Indexer;
pub use self::search::SearchService;
pub use self::splitter::{OwnedSplitChunk, SplitChunk, SplitMetadata, Splitter};
pub use self::store::{IndexedChunk, RetrievedChunk, VectorIndex};
use crate::Result;

/// High-level RAG service for document indexing and semantic search.
///
/// The service is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct RagService {
    inner: Arc<RagServiceInner>,
}

#[derive(Debug)]
struct RagServiceInner {
    embedding: EmbeddingService,
    splitter: Splitter,
    config: RagConfig,
    retry: RetryConfig,
}

impl RagService {
    /// Creates a new RAG service after validating `config`.
    pub fn new(embedding: EmbeddingService, config: RagConfig, retry: RetryConfig) -> Result<Self> {
        config.validate()?;
        let splitter = Splitter::new(config.max_chunk_characters, config.chunk_overlap_characters)?;

        Ok(Self {
            inner: Arc::new(RagServiceInner {
                embedding,
                splitter,
                config,
                retry,
            }),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Returns a reference to the text splitter.
    pub fn splitter(&self) -> &Splitter {
        &self.inner.splitter
    }

    /// Returns the embedding service.
    pub fn embedding(&self) -> &EmbeddingService {
        &self.inner.embedding
    }

    /// Splits text into chunks.
    pub fn split_text(&self, text: &str) -> Vec<OwnedSplitChunk> {
        self.inner.splitter.split_owned(text)
    }

    /// Creates an indexer for batch-embedding chunks.
    pub fn indexer(&self) -> Indexer {
        Indexer::new(self.inner.embedding.clone(), self.inner.retry.clone())
    }

    /// Returns the search service for direct access to search functionality.
    pub fn search_service(&self) -> SearchService {
        SearchService::new(self.inner.embedding.clone(), self.inner.retry.clone())
            .with_min_score(self.inner.config.min_score)
    }

    /// Embeds `chunks` into a new index.
    pub async fn index(&self, chunks: Vec<OwnedSplitChunk>) -> Result<VectorIndex> {
        self.indexer().index(chunks).await
    }

    /// Searches `index` for chunks relevant to `query`.
    pub async fn search(
        &self,
        index: &VectorIndex,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RetrievedChunk>> {
        self.search_service().search(index, query, limit).await
    }
}

#[cfg(test)]
mod tests {
    use quizgen_test::MockEmbeddingProvider;

    use super::*;

    fn rag() -> RagService {
        RagService::new(
            EmbeddingService::new(MockEmbeddingProvider::new(64)),
            RagConfig::default(),
            RetryConfig::no_retry(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn retrieves_the_chunk_about_the_query() {
        let text = [
            "Photosynthesis happens in chloroplasts and turns sunlight into sugar.",
            "The French Revolution began in 1789 with the storming of the Bastille.",
            "Plate tectonics explains earthquakes and the drift of continents.",
        ]
        .map(|p| format!("{p} {}", p.repeat(12)))
        .join("\n");

        let rag = rag();
        let chunks = rag.split_text(&text);
        assert!(chunks.len() >= 3);

        let index = rag.index(chunks).await.unwrap();
        let results = rag.search(&index, "Bastille revolution 1789", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].text.contains("Bastille"));
    }

    #[tokio::test]
    async fn index_from_another_model_is_rejected() {
        let rag = rag();
        let index = rag.index(rag.split_text("some text")).await.unwrap();

        let other = SearchService::new(
            EmbeddingService::new(MockEmbeddingProvider::new(64).with_model_name("other-model")),
            RetryConfig::no_retry(),
        );
        assert!(matches!(
            other.search(&index, "text", 1).await,
            Err(crate::Error::Retrieval(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RagConfig {
            chunk_overlap_characters: 5000,
            ..RagConfig::default()
        };
        let result = RagService::new(
            EmbeddingService::new(MockEmbeddingProvider::new(8)),
            config,
            RetryConfig::no_retry(),
        );
        assert!(result.is_err());
    }
}
