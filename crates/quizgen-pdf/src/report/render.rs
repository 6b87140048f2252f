//! PDF serialization of a laid out report.

use std::io::BufWriter;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::layout::{LineKind, ReportLayout, ReportStyle};
use crate::{Error, Result, TRACING_TARGET_REPORT};

/// Writes `layout` as a PDF using the built-in Helvetica fonts.
pub(crate) fn render_pdf(layout: &ReportLayout, style: &ReportStyle) -> Result<Vec<u8>> {
    let width = Mm(style.page_width_mm);
    let height = Mm(style.page_height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(&style.title, width, height, "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Render(e.to_string()))?;

    for (index, page) in layout.pages().iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Page {}", index + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font = match line.kind {
                LineKind::Body => &regular,
                LineKind::Title | LineKind::Heading => &bold,
            };
            layer.use_text(
                line.text.as_str(),
                line.font_size,
                Mm(line.x_mm),
                Mm(line.baseline_mm),
                font,
            );
        }
    }

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| Error::Render(e.to_string()))?;

    tracing::debug!(
        target: TRACING_TARGET_REPORT,
        pages = layout.pages().len(),
        bytes = bytes.len(),
        "Rendered report"
    );

    Ok(bytes)
}
