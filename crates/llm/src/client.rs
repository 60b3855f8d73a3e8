//! Service abstractions for the remote retrieval service.
//!
//! The dispatcher only ever talks to these traits; the HTTP implementation
//! lives in [`crate::providers`] and tests substitute in-memory stubs.

use crate::types::{
    Assistant, AssistantRequest, FileObject, IndexFilePage, InputMessage, PrimaryResult,
    ResponseRequest, Run, Thread, ThreadMessage,
};
use docqa_core::AppResult;

/// Synchronous request/response generation with retrieval (the direct protocol).
#[async_trait::async_trait]
pub trait ResponsesApi: Send + Sync {
    /// Provider name, for logging.
    fn provider_name(&self) -> &str;

    /// Create a response. Fails if the service rejects the request shape.
    async fn create_response(&self, request: &ResponseRequest) -> AppResult<PrimaryResult>;
}

/// Asynchronous assistant/thread/run workflow (the job protocol).
#[async_trait::async_trait]
pub trait AssistantsApi: Send + Sync {
    async fn create_assistant(&self, request: &AssistantRequest) -> AppResult<Assistant>;

    async fn create_thread(&self) -> AppResult<Thread>;

    async fn post_message(&self, thread_id: &str, message: &InputMessage) -> AppResult<()>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> AppResult<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> AppResult<Run>;

    /// Most recent messages of a thread, newest first.
    async fn list_messages(&self, thread_id: &str, limit: u32) -> AppResult<Vec<ThreadMessage>>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> AppResult<()>;

    async fn delete_assistant(&self, assistant_id: &str) -> AppResult<()>;

    async fn delete_thread(&self, thread_id: &str) -> AppResult<()>;
}

/// File metadata lookup and vector store file listing.
#[async_trait::async_trait]
pub trait FilesApi: Send + Sync {
    /// Look up a file by id. Fails with a transport error when not found.
    async fn retrieve_file(&self, file_id: &str) -> AppResult<FileObject>;

    /// One page of the files attached to a vector store.
    async fn list_index_files(
        &self,
        index_id: &str,
        limit: u32,
        after: Option<&str>,
    ) -> AppResult<IndexFilePage>;
}
