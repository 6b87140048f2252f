//! Batch embedding of document chunks into a [`VectorIndex`].

use quizgen_core::RetryConfig;
use quizgen_core::emb::EmbeddingService;

use super::splitter::OwnedSplitChunk;
use super::store::{IndexedChunk, VectorIndex};
use crate::{Error, Result, TRACING_TARGET};

/// Indexer for batch-embedding document chunks.
#[derive(Debug, Clone)]
pub struct Indexer {
    embedding: EmbeddingService,
    retry: RetryConfig,
}

impl Indexer {
    /// Creates a new indexer.
    pub fn new(embedding: EmbeddingService, retry: RetryConfig) -> Self {
        Self { embedding, retry }
    }

    /// Embeds every chunk and builds a fresh index.
    ///
    /// Chunks are sent in batches no larger than the provider accepts. Each
    /// batch is retried on transient failures; any other failure aborts the
    /// whole index.
    pub async fn index(&self, chunks: Vec<OwnedSplitChunk>) -> Result<VectorIndex> {
        if chunks.is_empty() {
            return Err(Error::retrieval("cannot build an index from zero chunks"));
        }

        let batch_size = self.embedding.max_batch_size();
        let expected_ndims = self.embedding.ndims();
        let mut entries = Vec::with_capacity(chunks.len());
        let mut remaining = chunks.into_iter().peekable();
        let mut batches = 0usize;

        while remaining.peek().is_some() {
            let batch: Vec<OwnedSplitChunk> = remaining.by_ref().take(batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();

            let embeddings = self
                .retry
                .retry("embed_texts", || self.embedding.embed_texts(&texts))
                .await
                .map_err(Error::Embedding)?;

            if embeddings.len() != batch.len() {
                return Err(Error::Embedding(
                    quizgen_core::Error::external_error().with_message(format!(
                        "embedding count mismatch: expected {}, got {}",
                        batch.len(),
                        embeddings.len()
                    )),
                ));
            }

            if let Some(bad) = embeddings.iter().find(|e| e.ndims() != expected_ndims) {
                return Err(Error::Embedding(
                    quizgen_core::Error::external_error().with_message(format!(
                        "embedding dimension mismatch: expected {expected_ndims}, got {}",
                        bad.ndims()
                    )),
                ));
            }

            entries.extend(
                batch
                    .into_iter()
                    .zip(embeddings)
                    .map(|(chunk, embedding)| IndexedChunk::new(chunk, embedding)),
            );
            batches += 1;
        }

        let index = VectorIndex::new(self.embedding.model_name(), expected_ndims, entries);

        tracing::info!(
            target: TRACING_TARGET,
            index_id = %index.id(),
            chunks = index.len(),
            batches,
            model = index.model_name(),
            "Built vector index"
        );

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use quizgen_core::ErrorKind;
    use quizgen_core::emb::EmbeddingService;
    use quizgen_test::MockEmbeddingProvider;

    use super::*;
    use crate::rag::splitter::Splitter;

    fn chunks(n: usize) -> Vec<OwnedSplitChunk> {
        let text = (0..n)
            .map(|i| format!("{i:03}{}", "z".repeat(47)))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = Splitter::new(99, 0).unwrap().split_owned(&text);
        assert_eq!(chunks.len(), n);
        chunks
    }

    #[tokio::test]
    async fn embeds_every_chunk_in_batches() {
        let provider = MockEmbeddingProvider::new(16).with_max_batch_size(4);
        let calls = provider.call_counter();
        let indexer = Indexer::new(EmbeddingService::new(provider), RetryConfig::no_retry());

        let index = indexer.index(chunks(10)).await.unwrap();

        assert_eq!(index.len(), 10);
        assert_eq!(index.ndims(), 16);
        assert_eq!(calls.get(), 3);
        let order: Vec<u32> = index.chunks().map(|c| c.chunk.metadata.chunk_index).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn authentication_failure_is_an_embedding_error() {
        let provider = MockEmbeddingProvider::new(8).failing(ErrorKind::Authentication);
        let indexer = Indexer::new(EmbeddingService::new(provider), RetryConfig::default());

        let err = indexer.index(chunks(2)).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert_eq!(err.service_kind(), Some(ErrorKind::Authentication));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let provider = MockEmbeddingProvider::new(8).failing_times(2, ErrorKind::RateLimited);
        let calls = provider.call_counter();
        let indexer = Indexer::new(EmbeddingService::new(provider), RetryConfig::default());

        let index = indexer.index(chunks(1)).await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn empty_chunk_set_is_rejected() {
        let indexer = Indexer::new(
            EmbeddingService::new(MockEmbeddingProvider::new(8)),
            RetryConfig::no_retry(),
        );
        assert!(matches!(
            indexer.index(Vec::new()).await,
            Err(Error::Retrieval(_))
        ));
    }
}
