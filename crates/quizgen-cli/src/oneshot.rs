//! Non-interactive `generate` command.

use anyhow::Context;
use quizgen_session::{Document, Session};

use crate::config::{GenerateArgs, ReportConfig};
use crate::shell::InterruptGuard;

/// Processes one PDF, prints the questions and exports them.
pub async fn run(
    mut session: Session,
    args: GenerateArgs,
    report: &ReportConfig,
) -> anyhow::Result<()> {
    let guard = InterruptGuard::new();

    let document = Document::read(&args.input).await?;
    session.upload(document);
    session.set_focus(args.focus);

    session
        .process(guard.token())
        .await
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    let result = session
        .generate(guard.token())
        .await
        .context("failed to generate questions")?;

    if args.json {
        let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
        println!("{json}");
    } else {
        println!("{}", result.answer);
    }

    if !args.no_export {
        let bytes = session.export(&report.output).await?;
        eprintln!("Wrote {} ({bytes} bytes).", report.output.display());
    }

    Ok(())
}
