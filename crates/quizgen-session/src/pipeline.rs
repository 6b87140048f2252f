//! The services a session drives.

use std::path::Path;

use quizgen_core::quiz::QuizSettings;
use quizgen_pdf::{ExtractedText, PdfExtractor, Report, ReportStyle};
use quizgen_rig::generation::{GenerationRequest, GenerationResult, QuestionGenerator};
use quizgen_rig::rag::RagService;

use crate::document::Document;
use crate::error::{ContentStage, Result, SessionError};
use crate::state::ProcessedDocument;
use crate::TRACING_TARGET;

/// Extraction, retrieval, generation and rendering, bundled.
///
/// Cheap to clone; every component is either stateless or `Arc`-backed.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: PdfExtractor,
    rag: RagService,
    generator: QuestionGenerator,
    report_style: ReportStyle,
}

impl Pipeline {
    /// Creates a pipeline with the default report style.
    pub fn new(rag: RagService, generator: QuestionGenerator) -> Self {
        Self {
            extractor: PdfExtractor::new(),
            rag,
            generator,
            report_style: ReportStyle::default(),
        }
    }

    /// Replaces the report style.
    pub fn with_report_style(mut self, report_style: ReportStyle) -> Self {
        self.report_style = report_style;
        self
    }

    /// Returns the retrieval service.
    pub fn rag(&self) -> &RagService {
        &self.rag
    }

    /// Returns the question generator.
    pub fn generator(&self) -> &QuestionGenerator {
        &self.generator
    }

    /// Extracts, chunks and embeds `document`.
    pub async fn process(&self, document: &Document) -> Result<ProcessedDocument> {
        let text = self.extract(document).await?;
        self.index_text(document, text).await
    }

    /// Extracts the text of `document` on the blocking pool.
    pub async fn extract(&self, document: &Document) -> Result<ExtractedText> {
        let extractor = self.extractor;
        let bytes = document.bytes().clone();
        tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await?
            .map_err(SessionError::Extraction)
    }

    /// Chunks and embeds already extracted text.
    pub async fn index_text(
        &self,
        document: &Document,
        text: ExtractedText,
    ) -> Result<ProcessedDocument> {
        if text.is_blank() {
            return Err(SessionError::EmptyContent {
                stage: ContentStage::Text,
            });
        }

        let chunks = self.rag.split_text(text.as_str());
        if chunks.is_empty() {
            return Err(SessionError::EmptyContent {
                stage: ContentStage::Chunks,
            });
        }

        tracing::debug!(
            target: TRACING_TARGET,
            document = document.name(),
            pages = text.page_count(),
            chars = text.char_count(),
            chunks = chunks.len(),
            "Indexing document"
        );

        let index = self
            .rag
            .index(chunks)
            .await
            .map_err(SessionError::EmbeddingService)?;

        Ok(ProcessedDocument {
            name: document.name().to_owned(),
            fingerprint: document.fingerprint(),
            text,
            index,
            processed_at: jiff::Timestamp::now(),
        })
    }

    /// Generates questions about `document`.
    ///
    /// Without a `focus` the opening of the document, up to one chunk long,
    /// is used as the retrieval query.
    pub async fn generate(
        &self,
        document: &ProcessedDocument,
        settings: QuizSettings,
        focus: Option<&str>,
    ) -> Result<GenerationResult> {
        let max_query_chars = self.rag.config().max_chunk_characters as usize;
        let request =
            GenerationRequest::for_document(settings, document.text.as_str(), focus, max_query_chars);

        self.generator
            .generate(&self.rag, &document.index, &request)
            .await
            .map_err(|err| match err {
                quizgen_rig::Error::Embedding(_) => SessionError::EmbeddingService(err),
                other => SessionError::GenerationService(other),
            })
    }

    /// Renders `result` and writes it to `path`; returns the bytes written.
    pub async fn export(&self, result: &GenerationResult, path: &Path) -> Result<usize> {
        Report::with_style(&result.answer, self.report_style.clone())
            .write_to(path)
            .await
            .map_err(SessionError::Export)
    }
}
