//! Text splitting for chunk creation.
//!
//! Chunks are measured in characters and never trimmed, so every byte of the
//! source belongs to at least one chunk. Split points follow the largest
//! semantic boundary that fits (line breaks before sentences before words).

mod chunk;

use std::fmt;

use text_splitter::{Characters, ChunkConfig, TextSplitter};

pub use self::chunk::{OwnedSplitChunk, SplitChunk, SplitMetadata};
use crate::{Error, Result};

/// Estimates the token count (~4 chars per token).
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() / 4) as u32
}

/// Text splitter service for creating document chunks.
pub struct Splitter {
    inner: TextSplitter<Characters>,
    max_characters: u32,
    overlap: u32,
}

impl Splitter {
    /// Creates a new text splitter.
    ///
    /// Fails if `overlap` is not smaller than `max_characters`.
    pub fn new(max_characters: u32, overlap: u32) -> Result<Self> {
        if max_characters == 0 {
            return Err(Error::config("chunk size must be greater than zero"));
        }

        let chunk_config = ChunkConfig::new(max_characters as usize)
            .with_overlap(overlap as usize)
            .map_err(|e| Error::config(format!("invalid chunk overlap: {e}")))?
            .with_trim(false);

        Ok(Self {
            inner: TextSplitter::new(chunk_config),
            max_characters,
            overlap,
        })
    }

    /// Returns the maximum chunk size in characters.
    pub fn max_characters(&self) -> u32 {
        self.max_characters
    }

    /// Returns the configured overlap in characters.
    pub fn overlap(&self) -> u32 {
        self.overlap
    }

    /// Splits text into chunks with byte offset tracking.
    ///
    /// Empty input yields no chunks.
    pub fn split<'a>(&self, text: &'a str) -> Vec<SplitChunk<'a>> {
        self.inner
            .chunk_indices(text)
            .enumerate()
            .map(|(chunk_index, (byte_offset, chunk_text))| {
                let end_offset = byte_offset + chunk_text.len();

                SplitChunk {
                    text: chunk_text,
                    metadata: SplitMetadata {
                        chunk_index: chunk_index as u32,
                        start_offset: byte_offset as u32,
                        end_offset: end_offset as u32,
                    },
                }
            })
            .collect()
    }

    /// Splits text and returns owned chunks.
    pub fn split_owned(&self, text: &str) -> Vec<OwnedSplitChunk> {
        self.split(text)
            .into_iter()
            .map(|c| c.into_owned())
            .collect()
    }
}

impl fmt::Debug for Splitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Splitter")
            .field("max_characters", &self.max_characters)
            .field("overlap", &self.overlap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> String {
        (1..=120)
            .map(|i| format!("Line {i}: the mitochondria is the powerhouse of the cell."))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn splitter() -> Splitter {
        Splitter::new(1000, 200).unwrap()
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(splitter().split("").is_empty());
    }

    #[test]
    fn short_text_is_a_single_identical_chunk() {
        let text = "Photosynthesis converts light into chemical energy.\nIt happens in chloroplasts.";
        let chunks = splitter().split(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);

        let exact = "x".repeat(1000);
        let chunks = splitter().split(&exact);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, exact);
    }

    #[test]
    fn chunks_reconstruct_the_source_without_gaps() {
        let text = sample_text();
        let chunks = splitter().split(&text);
        assert!(chunks.len() > 1);

        let mut rebuilt = String::new();
        let mut covered = 0usize;
        for chunk in &chunks {
            let start = chunk.metadata.start_offset as usize;
            let end = chunk.metadata.end_offset as usize;
            assert_eq!(&text[start..end], chunk.text);
            assert!(start <= covered, "gap before chunk {}", chunk.metadata.chunk_index);
            if end > covered {
                rebuilt.push_str(&text[covered..end]);
                covered = end;
            }
        }

        assert_eq!(rebuilt, text);
    }

    #[test]
    fn consecutive_chunks_overlap_consistently() {
        let text = sample_text();
        let chunks = splitter().split(&text);

        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let prev_end = prev.metadata.end_offset as usize;
            let next_start = next.metadata.start_offset as usize;
            assert!(next_start <= prev_end);

            let shared = &text[next_start..prev_end];
            assert!(shared.chars().count() <= 200);
            assert!(prev.text.ends_with(shared));
            assert!(next.text.starts_with(shared));
        }

        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 1000);
        }
    }

    #[test]
    fn prefers_newline_boundaries() {
        let first = vec!["alpha"; 100].join(" ");
        let second = vec!["omega"; 100].join(" ");
        let text = format!("{first}\n{second}");

        let chunks = splitter().split(&text);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].text.trim_end(), first);
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        assert!(matches!(Splitter::new(100, 100), Err(Error::Config(_))));
        assert!(matches!(Splitter::new(0, 0), Err(Error::Config(_))));
    }

    #[test]
    fn owned_chunks_keep_metadata() {
        let owned = splitter().split_owned(&sample_text());
        assert_eq!(owned[0].metadata.chunk_index, 0);
        assert_eq!(owned[1].metadata.chunk_index, 1);
        assert_eq!(owned[0].metadata.start_offset, 0);
    }

    #[test]
    fn token_estimate_is_a_quarter_of_bytes() {
        assert_eq!(estimate_tokens("abcdefgh"), 2);
    }
}
