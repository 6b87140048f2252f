//! Embedding provider abstraction.
//!
//! The retrieval pipeline only needs "text in, fixed-length vector out".
//! [`EmbeddingProvider`] captures that contract and [`EmbeddingService`] is
//! the cheap-to-clone handle the rest of the workspace passes around.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tracing target for embedding operations.
pub const TRACING_TARGET: &str = "quizgen_core::emb";

/// Default number of texts sent to a provider in a single request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 96;

/// A fixed-length vector produced by an embedding model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Vector components.
    pub vec: Vec<f64>,
}

impl Embedding {
    /// Wraps a raw vector.
    pub fn new(vec: Vec<f64>) -> Self {
        Self { vec }
    }

    /// Returns the number of dimensions.
    pub fn ndims(&self) -> usize {
        self.vec.len()
    }

    /// Cosine similarity in `[-1, 1]`.
    ///
    /// Returns `None` when the dimensions differ. A zero vector has a
    /// similarity of `0.0` with everything.
    pub fn cosine_similarity(&self, other: &Embedding) -> Option<f64> {
        if self.vec.len() != other.vec.len() {
            return None;
        }

        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;
        for (a, b) in self.vec.iter().zip(&other.vec) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        if norm_a == 0.0 || norm_b == 0.0 {
            return Some(0.0);
        }

        Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(vec: Vec<f64>) -> Self {
        Self::new(vec)
    }
}

/// Core trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the provider name (e.g. "gemini").
    fn provider_name(&self) -> &str;

    /// Returns the model identifier.
    fn model_name(&self) -> &str;

    /// Returns the dimensionality of produced vectors.
    fn ndims(&self) -> usize;

    /// Returns the largest batch accepted by a single call.
    fn max_batch_size(&self) -> usize {
        DEFAULT_MAX_BATCH_SIZE
    }

    /// Embeds `texts`, returning one vector per input in the same order.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Embedding>>;
}

/// Shared handle to an embedding provider.
#[derive(Clone)]
pub struct EmbeddingService {
    inner: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingService {
    /// Wraps a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: EmbeddingProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    /// Returns the model identifier.
    pub fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    /// Returns the dimensionality of produced vectors.
    pub fn ndims(&self) -> usize {
        self.inner.ndims()
    }

    /// Returns the largest batch accepted by a single call.
    pub fn max_batch_size(&self) -> usize {
        self.inner.max_batch_size().max(1)
    }

    /// Embeds a single text.
    pub async fn embed_text(&self, text: &str) -> Result<Embedding> {
        let mut embeddings = self.inner.embed_texts(&[text.to_owned()]).await?;
        embeddings.pop().ok_or_else(|| {
            Error::external_error().with_message("embedding provider returned no vectors")
        })
    }

    /// Embeds a batch of texts.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        tracing::trace!(
            target: TRACING_TARGET,
            provider = self.provider_name(),
            texts = texts.len(),
            "Embedding texts"
        );
        self.inner.embed_texts(texts).await
    }
}

impl fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingService")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("ndims", &self.ndims())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_of_parallel_vectors_is_one() {
        let a = Embedding::new(vec![1.0, 2.0, 3.0]);
        let b = Embedding::new(vec![2.0, 4.0, 6.0]);
        let score = a.cosine_similarity(&b).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_similarity_of_orthogonal_vectors_is_zero() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![0.0, 1.0]);
        assert_eq!(a.cosine_similarity(&b), Some(0.0));
    }

    #[test]
    fn mismatched_dimensions_have_no_similarity() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert_eq!(a.cosine_similarity(&b), None);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let a = Embedding::new(vec![0.0, 0.0]);
        let b = Embedding::new(vec![1.0, 1.0]);
        assert_eq!(a.cosine_similarity(&b), Some(0.0));
    }
}
