//! Split chunk types.

use serde::{Deserialize, Serialize};

/// Location of a chunk within the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMetadata {
    /// Chunk index within the source (0-based).
    pub chunk_index: u32,

    /// Start byte offset in the source text.
    pub start_offset: u32,

    /// End byte offset in the source text (exclusive).
    pub end_offset: u32,
}

/// A chunk produced by the text splitter (borrows from source text).
#[derive(Debug)]
pub struct SplitChunk<'a> {
    /// The chunk text content (borrowed from the source text).
    pub text: &'a str,

    /// Metadata about the chunk's position.
    pub metadata: SplitMetadata,
}

impl SplitChunk<'_> {
    /// Converts to an owned chunk.
    pub fn into_owned(self) -> OwnedSplitChunk {
        OwnedSplitChunk {
            text: self.text.to_string(),
            metadata: self.metadata,
        }
    }
}

/// An owned version of SplitChunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedSplitChunk {
    /// The chunk text content.
    pub text: String,

    /// Metadata about the chunk's position.
    pub metadata: SplitMetadata,
}
