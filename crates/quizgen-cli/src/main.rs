#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod oneshot;
mod shell;
mod telemetry;

use std::process;

use anyhow::Context;
use quizgen_session::Session;

use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "quizgen_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "quizgen_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "quizgen_cli::config";
pub const TRACING_TARGET_SHELL: &str = "quizgen_cli::shell";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    telemetry::init_tracing()?;

    cli.validate()?;
    cli.log();

    let pipeline = cli.create_pipeline().context("failed to set up AI providers")?;
    let session = Session::new(pipeline, cli.quiz.settings());

    match cli.command.clone().unwrap_or_default() {
        Command::Shell => shell::run(session, &cli.report).await,
        Command::Generate(args) => oneshot::run(session, args, &cli.report).await,
    }
}
