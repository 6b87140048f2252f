//! Error types for PDF extraction and rendering.

/// Result type alias for PDF operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while reading or writing PDF documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte stream is not a readable PDF.
    #[error("malformed PDF: {0}")]
    Malformed(#[source] lopdf::Error),

    /// The document is password protected.
    #[error("PDF is encrypted and cannot be read")]
    Encrypted,

    /// Text extraction failed on a page.
    #[error("failed to extract text from page {page}: {source}")]
    PageText {
        page: u32,
        #[source]
        source: lopdf::Error,
    },

    /// The report could not be serialized.
    #[error("failed to render PDF: {0}")]
    Render(String),

    /// Filesystem error while reading or writing a document.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
