//! Mock embedding provider for testing.

use std::hash::{DefaultHasher, Hash, Hasher};

use quizgen_core::emb::{DEFAULT_MAX_BATCH_SIZE, Embedding, EmbeddingProvider};
use quizgen_core::{ErrorKind, Result};

use super::{CallCounter, Failure};

/// Mock embedding provider for testing.
///
/// Each lowercase word is hashed into one of `ndims` buckets and the bucket
/// counts form the vector. Texts sharing vocabulary therefore score higher
/// than unrelated ones, which is enough to exercise retrieval.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    ndims: usize,
    model_name: String,
    max_batch_size: usize,
    failure: Failure,
    calls: CallCounter,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(64)
    }
}

impl MockEmbeddingProvider {
    /// Creates a provider producing `ndims`-dimensional vectors.
    pub fn new(ndims: usize) -> Self {
        Self {
            ndims,
            model_name: "mock-embedding".to_owned(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            failure: Failure::Never,
            calls: CallCounter::default(),
        }
    }

    /// Overrides the reported model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Overrides the batch size limit.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
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

    fn embed(&self, text: &str) -> Embedding {
        let mut vec = vec![0.0; self.ndims];
        if self.ndims == 0 {
            return Embedding::new(vec);
        }

        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty());
        for word in words {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.ndims as u64) as usize;
            vec[bucket] += 1.0;
        }

        Embedding::new(vec)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn ndims(&self) -> usize {
        self.ndims
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        self.failure.check(self.calls.record())?;
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shared_words_score_higher() {
        let mock = MockEmbeddingProvider::new(128);
        let texts = [
            "the storming of the Bastille".to_owned(),
            "Bastille storming".to_owned(),
            "chloroplast sugar".to_owned(),
        ];
        let vectors = mock.embed_texts(&texts).await.unwrap();

        let related = vectors[0].cosine_similarity(&vectors[1]).unwrap();
        let unrelated = vectors[0].cosine_similarity(&vectors[2]).unwrap();
        assert!(related > unrelated);
        assert_eq!(vectors[0].ndims(), 128);
    }

    #[tokio::test]
    async fn fails_then_recovers() {
        let mock = MockEmbeddingProvider::new(8).failing_times(1, ErrorKind::RateLimited);
        let calls = mock.call_counter();
        let texts = ["a".to_owned()];

        let err = mock.embed_texts(&texts).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(mock.embed_texts(&texts).await.is_ok());
        assert_eq!(calls.get(), 2);
    }
}
