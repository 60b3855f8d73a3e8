//! Question answering over a remote document index.
//!
//! Retrieval and generation happen inside the managed service. This crate
//! decides how to ask (direct request shapes, then the job protocol), turns
//! citations into file lists, enumerates the index and summarizes it.

pub mod citations;
pub mod dispatch;
pub mod lister;
pub mod progress;
pub mod rag;
pub mod registry;
pub mod summarize;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use citations::{aggregate_output_text, extract_primary_citations, extract_thread_citations};
pub use dispatch::{default_shapes, JobRunner, QueryDispatcher, RequestShape};
pub use lister::{IndexLister, PAGE_SIZE};
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use rag::{ask, AskResponse, SourceRef, MAX_DISPLAY_SOURCES};
pub use registry::FileRegistry;
pub use summarize::{BatchReport, BatchSummarizer, FileSummary, SummaryOutcome};
pub use types::{AnswerResult, IndexedFile, JobRun, Protocol, Query, EMPTY_ANSWER_PLACEHOLDER};
