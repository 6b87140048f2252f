use jiff::Timestamp;
use quizgen_pdf::ExtractedText;
use quizgen_rig::generation::GenerationResult;
use quizgen_rig::rag::VectorIndex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// A document that has been extracted, chunked and embedded.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Display name of the source upload.
    pub name: String,
    /// Hex SHA-256 of the source upload.
    pub fingerprint: String,
    /// Concatenated page text.
    pub text: ExtractedText,
    /// Embedded chunks of `text`.
    pub index: VectorIndex,
    /// When processing finished.
    pub processed_at: Timestamp,
}

impl ProcessedDocument {
    /// Number of chunks in the index.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }
}

/// A processed document together with the last answer generated from it.
#[derive(Debug, Clone)]
pub struct AnsweredState {
    pub document: ProcessedDocument,
    pub result: GenerationResult,
}

/// Where the session currently stands.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing processed yet, or the session was reset.
    #[default]
    Idle,
    /// A document is being extracted and indexed.
    Processing {
        /// Name of the document being processed.
        document: String,
    },
    /// A document is indexed and questions can be generated.
    Ready(ProcessedDocument),
    /// Questions were generated and can be exported.
    Answered(AnsweredState),
}

impl SessionState {
    /// Returns the phase tag of this state.
    pub fn phase(&self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Processing { .. } => SessionPhase::Processing,
            Self::Ready(_) => SessionPhase::Ready,
            Self::Answered(_) => SessionPhase::Answered,
        }
    }

    /// Returns the processed document, if there is one.
    pub fn document(&self) -> Option<&ProcessedDocument> {
        match self {
            Self::Ready(document) => Some(document),
            Self::Answered(answered) => Some(&answered.document),
            Self::Idle | Self::Processing { .. } => None,
        }
    }

    /// Returns the last generated answer, if there is one.
    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            Self::Answered(answered) => Some(&answered.result),
            _ => None,
        }
    }
}

/// Data-free tag of a [`SessionState`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Processing,
    Ready,
    Answered,
}
