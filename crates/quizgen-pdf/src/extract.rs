//! Text extraction from uploaded PDF documents.

use lopdf::Document;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, TRACING_TARGET_EXTRACT};

/// Text of a whole document, pages concatenated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    text: String,
    page_count: usize,
}

impl ExtractedText {
    /// Wraps already extracted text.
    pub fn new(text: impl Into<String>, page_count: usize) -> Self {
        Self {
            text: text.into(),
            page_count,
        }
    }

    /// Returns the full text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the number of pages the text came from.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Returns the number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the document carries no readable text.
    ///
    /// Scanned, image-only PDFs end up here.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns at most `max_chars` leading characters, ending on a char
    /// boundary.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Consumes the wrapper.
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Stateless PDF text extractor backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts and concatenates the text of every page.
    ///
    /// This is CPU bound; async callers should run it on a blocking thread.
    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let document = Document::load_mem(bytes).map_err(Error::Malformed)?;
        self.extract_document(document)
    }

    fn extract_document(&self, mut document: Document) -> Result<ExtractedText> {
        // Owner-password-only files open with the empty user password.
        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                tracing::warn!(target: TRACING_TARGET_EXTRACT, "Rejected encrypted PDF");
                return Err(Error::Encrypted);
            }
            tracing::debug!(target: TRACING_TARGET_EXTRACT, "Opened PDF with the empty password");
        }

        let pages = document.get_pages();
        let mut text = String::new();
        for &page in pages.keys() {
            let page_text = document
                .extract_text(&[page])
                .map_err(|source| Error::PageText { page, source })?;
            text.push_str(&page_text);
        }

        let extracted = ExtractedText::new(text, pages.len());
        tracing::debug!(
            target: TRACING_TARGET_EXTRACT,
            pages = extracted.page_count(),
            chars = extracted.char_count(),
            "Extracted PDF text"
        );

        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use lopdf::{Object, dictionary};

    use super::*;
    use crate::Report;

    #[test]
    fn garbage_bytes_are_malformed() {
        let err = PdfExtractor::new().extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = PdfExtractor::new().extract(&[]).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn rendered_report_is_read_back_in_page_order() {
        let answer = (1..=80)
            .map(|i| format!("**Part {i}**\nQuestion {i}: what happens?"))
            .collect::<Vec<_>>()
            .join("\n");
        let report = Report::new(&answer);
        let bytes = report.to_pdf_bytes().unwrap();

        let extracted = PdfExtractor::new().extract(&bytes).unwrap();
        assert!(report.page_count() > 1);
        assert_eq!(extracted.page_count(), report.page_count());

        let text = extracted.as_str();
        let title = text.find("Generated Questions").unwrap();
        let first = text.find("Question 1:").unwrap();
        let last = text.find("Question 80:").unwrap();
        assert!(title < first);
        assert!(first < last);
    }

    /// Marks `document` encrypted with a dictionary no password can open.
    fn lock(document: &mut Document) {
        let encrypt = document.add_object(dictionary! { "Filter" => "Standard" });
        document.trailer.set("Encrypt", Object::Reference(encrypt));
    }

    #[test]
    fn encrypted_document_without_usable_password_is_rejected() {
        let mut document = Document::with_version("1.5");
        lock(&mut document);
        assert!(document.is_encrypted());

        let err = PdfExtractor::new().extract_document(document).unwrap_err();
        assert!(matches!(err, Error::Encrypted));
    }

    #[test]
    fn encrypted_bytes_are_rejected() {
        let rendered = Report::new("Q1: What?").to_pdf_bytes().unwrap();
        let mut document = Document::load_mem(&rendered).unwrap();
        lock(&mut document);
        let mut bytes = Vec::new();
        document.save_to(&mut bytes).unwrap();

        let err = PdfExtractor::new().extract(&bytes).unwrap_err();
        assert!(matches!(err, Error::Encrypted));
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        assert!(ExtractedText::new(" \n\t ", 1).is_blank());
        assert!(ExtractedText::default().is_blank());
        assert!(!ExtractedText::new("Chapter 1", 1).is_blank());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let text = ExtractedText::new("héllo wörld", 1);
        assert_eq!(text.preview(4), "héll");
        assert_eq!(text.preview(100), "héllo wörld");
        assert_eq!(text.char_count(), 11);
    }
}
