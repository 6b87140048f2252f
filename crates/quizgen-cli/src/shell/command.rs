//! Parsing of shell input lines.

use std::path::PathBuf;

use quizgen_core::quiz::{ComplexityLevel, QuestionCount, QuestionCountError, QuestionType};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Upload(PathBuf),
    Process,
    Set(Setting),
    Focus(Option<String>),
    Settings,
    Generate,
    Show,
    Export(Option<PathBuf>),
    Status,
    Reset,
    Help,
    Quit,
}

/// A single quiz setting change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    QuestionType(QuestionType),
    Complexity(ComplexityLevel),
    Count(QuestionCount),
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown question type `{0}` (multiple-choice, short-answer, true-false, open-ended)")]
    QuestionType(String),
    #[error("unknown complexity `{0}` (basic, intermediate, advanced)")]
    Complexity(String),
    #[error(transparent)]
    Count(#[from] QuestionCountError),
}

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  upload <file.pdf>      stage a PDF
  process                extract and index the staged PDF
  set type <value>       multiple-choice | short-answer | true-false | open-ended
  set complexity <value> basic | intermediate | advanced
  set count <5-20>       number of questions
  focus [topic]          steer retrieval towards a topic; no topic clears it
  settings               show the current quiz settings
  generate               generate questions from the processed PDF
  show                   print the last generated questions
  export [path]          write the last questions to a PDF
  status                 show the session state
  reset                  clear the document and questions
  help                   show this text
  quit                   leave the shell

Press Ctrl-C while processing or generating to cancel.";

impl ShellCommand {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "upload" | "open" => {
                if rest.is_empty() {
                    return Err(ParseError::Usage("upload <file.pdf>"));
                }
                Self::Upload(PathBuf::from(unquote(rest)))
            }
            "process" => Self::Process,
            "set" => Self::Set(parse_setting(rest)?),
            "focus" => Self::Focus((!rest.is_empty()).then(|| rest.to_owned())),
            "settings" => Self::Settings,
            "generate" | "gen" => Self::Generate,
            "show" => Self::Show,
            "export" => Self::Export((!rest.is_empty()).then(|| PathBuf::from(unquote(rest)))),
            "status" => Self::Status,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_owned())),
        };

        Ok(Some(command))
    }
}

fn parse_setting(args: &str) -> Result<Setting, ParseError> {
    const USAGE: &str = "set <type|complexity|count> <value>";

    let Some((key, value)) = args.split_once(char::is_whitespace) else {
        return Err(ParseError::Usage(USAGE));
    };
    let value = value.trim();

    match key.to_ascii_lowercase().as_str() {
        "type" => value
            .parse()
            .map(Setting::QuestionType)
            .map_err(|_| ParseError::QuestionType(value.to_owned())),
        "complexity" => value
            .parse()
            .map(Setting::Complexity)
            .map_err(|_| ParseError::Complexity(value.to_owned())),
        "count" => Ok(Setting::Count(value.parse()?)),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        ShellCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(parse("process"), ShellCommand::Process);
        assert_eq!(parse("  GENERATE "), ShellCommand::Generate);
        assert_eq!(parse("exit"), ShellCommand::Quit);
        assert_eq!(parse("export"), ShellCommand::Export(None));
    }

    #[test]
    fn parses_paths_with_spaces() {
        assert_eq!(
            parse("upload \"my notes.pdf\""),
            ShellCommand::Upload(PathBuf::from("my notes.pdf"))
        );
        assert_eq!(
            parse("export out/quiz 1.pdf"),
            ShellCommand::Export(Some(PathBuf::from("out/quiz 1.pdf")))
        );
    }

    #[test]
    fn parses_settings() {
        assert_eq!(
            parse("set type true-false"),
            ShellCommand::Set(Setting::QuestionType(QuestionType::TrueFalse))
        );
        assert_eq!(
            parse("set complexity advanced"),
            ShellCommand::Set(Setting::Complexity(ComplexityLevel::Advanced))
        );
        assert_eq!(
            parse("set count 20"),
            ShellCommand::Set(Setting::Count(QuestionCount::new(20).unwrap()))
        );
    }

    #[test]
    fn rejects_out_of_domain_values() {
        assert!(matches!(
            ShellCommand::parse("set count 21"),
            Err(ParseError::Count(QuestionCountError::OutOfRange { value: 21 }))
        ));
        assert!(matches!(
            ShellCommand::parse("set count 4"),
            Err(ParseError::Count(_))
        ));
        assert!(matches!(
            ShellCommand::parse("set type essay"),
            Err(ParseError::QuestionType(_))
        ));
        assert!(matches!(ShellCommand::parse("set count"), Err(ParseError::Usage(_))));
        assert!(matches!(ShellCommand::parse("upload"), Err(ParseError::Usage(_))));
        assert!(matches!(ShellCommand::parse("dance"), Err(ParseError::Unknown(_))));
    }

    #[test]
    fn focus_without_topic_clears() {
        assert_eq!(parse("focus"), ShellCommand::Focus(None));
        assert_eq!(
            parse("focus cell biology"),
            ShellCommand::Focus(Some("cell biology".to_owned()))
        );
    }
}
