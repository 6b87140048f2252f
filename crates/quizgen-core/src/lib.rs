#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod retry;

pub mod emb;
pub mod llm;
pub mod quiz;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use retry::RetryConfig;

/// Tracing target for retry and timeout handling.
pub const TRACING_TARGET_RETRY: &str = "quizgen_core::retry";
