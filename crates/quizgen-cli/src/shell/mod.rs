//! Interactive shell driving a single [`Session`].

mod command;
mod interrupt;

use std::io::Write;

use anyhow::Context;
use quizgen_session::{
    Document, Session, SessionAction, SessionEvent, SessionPhase, SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use self::command::{HELP, Setting, ShellCommand};
pub use self::interrupt::InterruptGuard;
use crate::TRACING_TARGET_SHELL;
use crate::config::ReportConfig;

const PROMPT: &str = "quizgen> ";
const PREVIEW_CHARS: usize = 160;

/// Reads commands from stdin until `quit`, end of input or Ctrl-C at the prompt.
pub async fn run(mut session: Session, report: &ReportConfig) -> anyhow::Result<()> {
    let status = spawn_status_printer(session.subscribe());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("quizgen {}; type `help` for commands.", env!("CARGO_PKG_VERSION"));

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush().context("failed to write to stdout")?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(err) = execute(&mut session, command, report).await {
            tracing::debug!(target: TRACING_TARGET_SHELL, error = ?err, "Command failed");
            eprintln!("error: {err:#}");
        }
    }

    status.abort();
    Ok(())
}

/// Runs one command against the session.
async fn execute(
    session: &mut Session,
    command: ShellCommand,
    report: &ReportConfig,
) -> anyhow::Result<()> {
    match command {
        ShellCommand::Upload(path) => {
            let document = Document::read(&path).await?;
            println!("Staged {} ({} bytes); run `process` next.", document.name(), document.len());
            session.upload(document);
        }
        ShellCommand::Process => {
            let guard = InterruptGuard::new();
            let document = session.process(guard.token()).await?;
            println!(
                "Processed {}: {} page(s), {} chunk(s).",
                document.name,
                document.text.page_count(),
                document.chunk_count()
            );
            println!("  {}...", document.text.preview(PREVIEW_CHARS).replace('\n', " "));
        }
        ShellCommand::Set(setting) => {
            let settings = session.settings_mut();
            match setting {
                Setting::QuestionType(value) => settings.question_type = value,
                Setting::Complexity(value) => settings.complexity = value,
                Setting::Count(value) => settings.num_questions = value,
            }
            println!("Settings: {}", session.settings());
        }
        ShellCommand::Focus(focus) => {
            session.set_focus(focus);
            match session.focus() {
                Some(topic) => println!("Focus: {topic}"),
                None => println!("Focus cleared."),
            }
        }
        ShellCommand::Settings => {
            println!("Settings: {}", session.settings());
            println!("Focus: {}", session.focus().unwrap_or("(none)"));
        }
        ShellCommand::Generate => {
            let guard = InterruptGuard::new();
            let result = session.generate(guard.token()).await?;
            println!("{}", result.answer);
        }
        ShellCommand::Show => match session.state().result() {
            Some(result) => println!("{}", result.answer),
            None => println!("Nothing generated yet."),
        },
        ShellCommand::Export(path) => {
            let path = path.unwrap_or_else(|| report.output.clone());
            let bytes = session.export(&path).await?;
            println!("Wrote {} ({bytes} bytes).", path.display());
        }
        ShellCommand::Status => print_status(session),
        ShellCommand::Reset => {
            session.reset();
            println!("Session cleared.");
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }

    Ok(())
}

fn print_status(session: &Session) {
    println!("State: {}", session.phase());
    match session.state() {
        SessionState::Processing { document } => println!("Processing: {document}"),
        state => {
            if let Some(document) = state.document() {
                println!(
                    "Document: {} ({} chunks, processed {})",
                    document.name,
                    document.chunk_count(),
                    document.processed_at
                );
            }
            if let Some(result) = state.result() {
                println!(
                    "Last answer: {} from {}/{} at {}",
                    result.settings, result.provider, result.model, result.generated_at
                );
            }
        }
    }
    if let Some(pending) = session.pending_upload() {
        println!("Staged: {} ({} bytes)", pending.name(), pending.len());
    }
}

/// Prints a busy line whenever a long-running phase starts.
fn spawn_status_printer(mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) if event.is_busy() => {
                    if let Some(message) = busy_message(&event) {
                        eprintln!("{message}");
                    }
                }
                Ok(SessionEvent::StateChanged {
                    from: SessionPhase::Processing,
                    to,
                }) if to != SessionPhase::Ready => {
                    eprintln!("Processing stopped; session is {to}.");
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn busy_message(event: &SessionEvent) -> Option<&'static str> {
    match event {
        SessionEvent::StateChanged {
            to: SessionPhase::Processing,
            ..
        } => Some("Processing document..."),
        SessionEvent::ActionStarted {
            action: SessionAction::Generate,
        } => Some("Generating questions..."),
        SessionEvent::ActionStarted {
            action: SessionAction::Export,
        } => Some("Exporting PDF..."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_busy_event_has_a_message() {
        let events = [
            SessionEvent::StateChanged {
                from: SessionPhase::Ready,
                to: SessionPhase::Processing,
            },
            SessionEvent::ActionStarted {
                action: SessionAction::Generate,
            },
            SessionEvent::ActionStarted {
                action: SessionAction::Export,
            },
        ];
        for event in events {
            assert!(event.is_busy());
            assert!(busy_message(&event).is_some());
        }

        let finished = SessionEvent::ActionFinished {
            action: SessionAction::Export,
            ok: true,
        };
        assert_eq!(busy_message(&finished), None);
    }
}
