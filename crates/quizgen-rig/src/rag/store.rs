//! In-memory vector index over the chunks of one document.

use jiff::Timestamp;
use quizgen_core::emb::Embedding;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::splitter::{OwnedSplitChunk, estimate_tokens};
use crate::{Error, Result};

/// A chunk stored together with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: OwnedSplitChunk,
    pub embedding: Embedding,
    /// Rough token count of the chunk text.
    pub token_count: u32,
}

impl IndexedChunk {
    pub(crate) fn new(chunk: OwnedSplitChunk, embedding: Embedding) -> Self {
        let token_count = estimate_tokens(&chunk.text);
        Self {
            chunk,
            embedding,
            token_count,
        }
    }
}

/// A chunk returned by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Index of the chunk within the document (0-based).
    pub chunk_index: u32,
    /// Cosine similarity to the query (higher is more similar).
    pub score: f64,
    /// Start byte offset in the source text.
    pub start_offset: u32,
    /// End byte offset in the source text.
    pub end_offset: u32,
    /// Chunk text.
    pub text: String,
}

/// Vectors for every chunk of a processed document.
///
/// Built once per document and replaced, never merged, when a new document
/// is processed.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    id: Uuid,
    model_name: String,
    ndims: usize,
    entries: Vec<IndexedChunk>,
    created_at: Timestamp,
}

impl VectorIndex {
    pub(crate) fn new(model_name: impl Into<String>, ndims: usize, entries: Vec<IndexedChunk>) -> Self {
        Self {
            id: Uuid::now_v7(),
            model_name: model_name.into(),
            ndims,
            entries,
            created_at: Timestamp::now(),
        }
    }

    /// Returns the unique identifier of this index.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the embedding model the vectors came from.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the vector dimensionality.
    pub fn ndims(&self) -> usize {
        self.ndims
    }

    /// Returns the number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns when the index was built.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Iterates over the indexed chunks in document order.
    pub fn chunks(&self) -> impl Iterator<Item = &IndexedChunk> {
        self.entries.iter()
    }

    /// Returns the `k` chunks most similar to `query`.
    ///
    /// Results are ordered by descending cosine similarity; ties keep
    /// document order. Chunks scoring below `min_score` are skipped.
    pub fn top_k(
        &self,
        query: &Embedding,
        k: usize,
        min_score: Option<f64>,
    ) -> Result<Vec<RetrievedChunk>> {
        if query.ndims() != self.ndims {
            return Err(Error::retrieval(format!(
                "query has {} dimensions, index expects {}",
                query.ndims(),
                self.ndims
            )));
        }

        let mut scored: Vec<(f64, &IndexedChunk)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = query.cosine_similarity(&entry.embedding)?;
                Some((score, entry))
            })
            .filter(|(score, _)| min_score.is_none_or(|min| *score >= min))
            .collect();

        scored.sort_by(|(a, ea), (b, eb)| {
            b.total_cmp(a)
                .then(ea.chunk.metadata.chunk_index.cmp(&eb.chunk.metadata.chunk_index))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| RetrievedChunk {
                chunk_index: entry.chunk.metadata.chunk_index,
                score,
                start_offset: entry.chunk.metadata.start_offset,
                end_offset: entry.chunk.metadata.end_offset,
                text: entry.chunk.text.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::splitter::SplitMetadata;

    fn entry(index: u32, text: &str, vec: Vec<f64>) -> IndexedChunk {
        IndexedChunk::new(
            OwnedSplitChunk {
                text: text.to_owned(),
                metadata: SplitMetadata {
                    chunk_index: index,
                    start_offset: 0,
                    end_offset: text.len() as u32,
                },
            },
            Embedding::new(vec),
        )
    }

    fn index() -> VectorIndex {
        VectorIndex::new(
            "test-model",
            2,
            vec![
                entry(0, "cells", vec![1.0, 0.0]),
                entry(1, "planets", vec![0.0, 1.0]),
                entry(2, "cells again", vec![1.0, 0.0]),
                entry(3, "mixed", vec![1.0, 1.0]),
            ],
        )
    }

    #[test]
    fn returns_most_similar_first() {
        let results = index().top_k(&Embedding::new(vec![1.0, 0.1]), 3, None).unwrap();
        let order: Vec<u32> = results.iter().map(|r| r.chunk_index).collect();
        assert_eq!(order, vec![0, 2, 3]);
        assert!(results[0].score >= results[2].score);
    }

    #[test]
    fn ties_keep_document_order() {
        let results = index().top_k(&Embedding::new(vec![1.0, 0.0]), 2, None).unwrap();
        assert_eq!(results[0].chunk_index, 0);
        assert_eq!(results[1].chunk_index, 2);
    }

    #[test]
    fn min_score_filters_results() {
        let results = index()
            .top_k(&Embedding::new(vec![0.0, 1.0]), 10, Some(0.5))
            .unwrap();
        let order: Vec<u32> = results.iter().map(|r| r.chunk_index).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        assert_eq!(index().top_k(&Embedding::new(vec![1.0, 1.0]), 99, None).unwrap().len(), 4);
    }

    #[test]
    fn dimension_mismatch_is_a_retrieval_error() {
        let err = index()
            .top_k(&Embedding::new(vec![1.0, 0.0, 0.0]), 1, None)
            .unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
    }
}
