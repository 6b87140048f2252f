#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod document;
mod error;
mod event;
mod pipeline;
mod session;
mod state;

pub use document::Document;
pub use error::{ContentStage, Result, SessionError};
pub use event::{SessionAction, SessionEvent};
pub use pipeline::Pipeline;
pub use session::Session;
pub use state::{AnsweredState, ProcessedDocument, SessionPhase, SessionState};

/// Tracing target for session state changes and actions.
pub const TRACING_TARGET: &str = "quizgen_session";
