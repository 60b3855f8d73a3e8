//! Question answering over the remote index.
//!
//! Retrieval and generation both happen inside the managed service; this
//! module dispatches the question and turns citations into display names.

pub mod ask;
pub mod types;

pub use ask::ask;
pub use types::{AskResponse, SourceRef, MAX_DISPLAY_SOURCES};
