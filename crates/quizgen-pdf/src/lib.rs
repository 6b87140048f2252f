#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod extract;
pub mod report;

pub use error::{Error, Result};
pub use extract::{ExtractedText, PdfExtractor};
pub use report::{DEFAULT_REPORT_FILE_NAME, Report, ReportLayout, ReportStyle};

/// Tracing target for PDF text extraction.
pub const TRACING_TARGET_EXTRACT: &str = "quizgen_pdf::extract";

/// Tracing target for report rendering.
pub const TRACING_TARGET_REPORT: &str = "quizgen_pdf::report";
