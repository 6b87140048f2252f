//! Question report rendering.

mod layout;
mod render;

use std::path::Path;

pub use layout::{Block, LineKind, PlacedLine, ReportLayout, ReportPage, ReportStyle, to_win_ansi};

use crate::{Result, TRACING_TARGET_REPORT};

/// File name used when the caller does not choose one.
pub const DEFAULT_REPORT_FILE_NAME: &str = "generated_questions.pdf";

/// A generated answer laid out as a printable document.
#[derive(Debug, Clone)]
pub struct Report {
    layout: ReportLayout,
    style: ReportStyle,
}

impl Report {
    /// Lays out `answer` with the default A4 style.
    pub fn new(answer: &str) -> Self {
        Self::with_style(answer, ReportStyle::default())
    }

    /// Lays out `answer` with a custom style.
    pub fn with_style(answer: &str, style: ReportStyle) -> Self {
        let layout = ReportLayout::build(answer, &style);
        Self { layout, style }
    }

    /// Returns the computed layout.
    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Returns the number of pages.
    pub fn page_count(&self) -> usize {
        self.layout.pages().len()
    }

    /// Serializes the report to PDF bytes.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>> {
        render::render_pdf(&self.layout, &self.style)
    }

    /// Renders the report and writes it to `path`, returning the byte count.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.to_pdf_bytes()?;
        tokio::fs::write(path, &bytes).await?;

        tracing::info!(
            target: TRACING_TARGET_REPORT,
            path = %path.display(),
            pages = self.page_count(),
            bytes = bytes.len(),
            "Report written"
        );

        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_pdf_with_one_page_per_layout_page() {
        let answer = (1..=90)
            .map(|i| format!("* Part {i}\n{i}. What happens in part {i}?"))
            .collect::<Vec<_>>()
            .join("\n");
        let report = Report::new(&answer);
        assert!(report.page_count() > 1);

        let bytes = report.to_pdf_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), report.page_count());
    }

    #[tokio::test]
    async fn writes_report_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILE_NAME);

        let written = Report::new("* Section A\nQ1: What is X?")
            .write_to(&path)
            .await
            .unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk.len(), written);
        assert!(on_disk.starts_with(b"%PDF"));
    }
}
