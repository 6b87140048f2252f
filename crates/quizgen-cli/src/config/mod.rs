//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── command: Option<Command>   # shell (default) or one-shot generate
//! ├── provider: ProviderConfig   # backends, models, API keys
//! ├── rag: RagConfig             # chunk size/overlap, top-k, min score
//! ├── service: ServiceConfig     # timeouts and retries
//! ├── quiz: QuizConfig           # initial question type/complexity/count
//! └── report: ReportConfig       # export path and title
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod provider;
mod quiz;
mod report;
mod service;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
pub use provider::ProviderConfig;
use quizgen_rig::generation::QuestionGenerator;
use quizgen_rig::rag::{RagConfig, RagService};
use quizgen_session::Pipeline;
pub use quiz::QuizConfig;
pub use report::ReportConfig;
pub use service::ServiceConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "quizgen")]
#[command(about = "Generate quiz questions from PDF documents")]
#[command(version)]
pub struct Cli {
    /// What to run; the interactive shell when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Embedding and completion providers.
    #[clap(flatten)]
    pub provider: ProviderConfig,

    /// Chunking and retrieval.
    #[clap(flatten)]
    pub rag: RagConfig,

    /// Timeouts and retries for provider calls.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Initial quiz settings.
    #[clap(flatten)]
    pub quiz: QuizConfig,

    /// PDF export.
    #[clap(flatten)]
    pub report: ReportConfig,
}

/// Top-level commands.
#[derive(Debug, Clone, Default, Subcommand)]
pub enum Command {
    /// Start the interactive shell.
    #[default]
    Shell,
    /// Process one PDF, print the questions and export them.
    Generate(GenerateArgs),
}

/// Arguments of the one-shot `generate` command.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// PDF file to generate questions from.
    pub input: PathBuf,

    /// Topic to focus retrieval on.
    #[arg(long)]
    pub focus: Option<String>,

    /// Print the result as JSON instead of plain text.
    #[arg(long)]
    pub json: bool,

    /// Skip writing the PDF report.
    #[arg(long)]
    pub no_export: bool,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read before parsing so that clap's `env` fallbacks
    /// can see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.rag.validate().context("invalid retrieval configuration")?;
        self.provider
            .validate()
            .context("invalid provider configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Builds the services a session runs on.
    pub fn create_pipeline(&self) -> anyhow::Result<Pipeline> {
        let retry = self.service.retry_config();
        let embedding = self.provider.create_embedding_service()?;
        let completion = self.provider.create_completion_service()?;

        let rag = RagService::new(embedding, self.rag.clone(), retry.clone())
            .context("failed to create retrieval service")?;
        let generator = QuestionGenerator::new(completion, retry);

        Ok(Pipeline::new(rag, generator).with_report_style(self.report.style()))
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.provider.log();
        self.service.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            chunk_size = self.rag.max_chunk_characters,
            chunk_overlap = self.rag.chunk_overlap_characters,
            top_k = self.rag.max_results,
            min_score = ?self.rag.min_score,
            "Retrieval configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "quizgen",
            "--groq-api-key",
            "g",
            "--google-api-key",
            "k",
            "--num-questions",
            "12",
            "generate",
            "notes.pdf",
            "--focus",
            "cells",
        ])
        .unwrap();

        assert_eq!(cli.quiz.settings().num_questions.get(), 12);
        match cli.command {
            Some(Command::Generate(ref args)) => {
                assert_eq!(args.input, PathBuf::from("notes.pdf"));
                assert_eq!(args.focus.as_deref(), Some("cells"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn out_of_range_count_is_rejected() {
        let parsed = Cli::try_parse_from(["quizgen", "--num-questions", "25"]);
        assert!(parsed.is_err());
    }
}
