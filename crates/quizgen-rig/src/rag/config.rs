//! RAG pipeline configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for chunking and retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RagConfig {
    /// Maximum chunk size in characters
    #[cfg_attr(
        feature = "config",
        arg(long = "chunk-size", env = "QUIZGEN_CHUNK_SIZE", default_value = "1000")
    )]
    #[serde(default = "default_max_chunk_characters")]
    pub max_chunk_characters: u32,

    /// Characters shared by consecutive chunks
    #[cfg_attr(
        feature = "config",
        arg(long = "chunk-overlap", env = "QUIZGEN_CHUNK_OVERLAP", default_value = "200")
    )]
    #[serde(default = "default_chunk_overlap_characters")]
    pub chunk_overlap_characters: u32,

    /// Number of chunks retrieved as context for generation
    #[cfg_attr(
        feature = "config",
        arg(long = "top-k", env = "QUIZGEN_TOP_K", default_value = "4")
    )]
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Minimum cosine similarity of retrieved chunks (no filtering if unset)
    #[cfg_attr(feature = "config", arg(long = "min-score", env = "QUIZGEN_MIN_SCORE"))]
    #[serde(default)]
    pub min_score: Option<f64>,
}

fn default_max_chunk_characters() -> u32 {
    1000
}

fn default_chunk_overlap_characters() -> u32 {
    200
}

fn default_max_results() -> u32 {
    4
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_chunk_characters: default_max_chunk_characters(),
            chunk_overlap_characters: default_chunk_overlap_characters(),
            max_results: default_max_results(),
            min_score: None,
        }
    }
}

impl RagConfig {
    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_characters == 0 {
            return Err(Error::config("chunk size must be greater than zero"));
        }
        if self.chunk_overlap_characters >= self.max_chunk_characters {
            return Err(Error::config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap_characters, self.max_chunk_characters
            )));
        }
        if self.max_results == 0 {
            return Err(Error::config("top-k must be greater than zero"));
        }
        if let Some(score) = self.min_score
            && !(-1.0..=1.0).contains(&score)
        {
            return Err(Error::config(format!(
                "minimum score must be within [-1, 1], got {score}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RagConfig::default();
        assert_eq!(config.max_chunk_characters, 1000);
        assert_eq!(config.chunk_overlap_characters, 200);
        assert_eq!(config.max_results, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk() {
        let config = RagConfig {
            chunk_overlap_characters: 1000,
            ..RagConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn min_score_is_bounded() {
        let config = RagConfig {
            min_score: Some(1.5),
            ..RagConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
