//! PDF export configuration.

use std::path::PathBuf;

use clap::Args;
use quizgen_pdf::{DEFAULT_REPORT_FILE_NAME, ReportStyle};

/// Where and how exported questions are written.
#[derive(Debug, Clone, Args)]
pub struct ReportConfig {
    /// Default export path.
    #[arg(long, short = 'o', env = "QUIZGEN_OUTPUT", default_value = DEFAULT_REPORT_FILE_NAME)]
    pub output: PathBuf,

    /// Title printed at the top of the report.
    #[arg(long, env = "QUIZGEN_REPORT_TITLE", default_value = "Generated Questions")]
    pub report_title: String,
}

impl ReportConfig {
    /// Returns the report style for the configured title.
    pub fn style(&self) -> ReportStyle {
        ReportStyle {
            title: self.report_title.clone(),
            ..ReportStyle::default()
        }
    }
}
