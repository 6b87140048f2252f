#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod mock;

pub use mock::{
    CallCounter, MockCompletionProvider, MockEmbeddingProvider, PromptLog, mock_completion_service,
    mock_embedding_service,
};
