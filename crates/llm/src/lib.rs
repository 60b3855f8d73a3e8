//! Remote service integration for DocQA.
//!
//! This crate defines the service traits the query dispatcher depends on,
//! the wire types of the OpenAI-compatible API, and an HTTP implementation.
//!
//! # Example
//! ```no_run
//! use docqa_llm::{ResponsesApi, ResponseRequest, providers::OpenAiClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("https://api.openai.com/v1", "sk-...", Duration::from_secs(60))?;
//! let request = ResponseRequest::new("gpt-4o-mini", "Answer briefly.", "What is in the files?");
//! let result = client.create_response(&request).await?;
//! println!("{:?}", result.output_text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{AssistantsApi, FilesApi, ResponsesApi};
pub use factory::create_client;
pub use providers::OpenAiClient;
pub use types::{
    Annotation, Assistant, AssistantRequest, FileObject, IndexFileEntry, IndexFilePage,
    InputMessage, OutputBlock, OutputContent, PrimaryResult, ResponseRequest, Run, RunStatus,
    Thread, ThreadMessage, ToolResources, ToolSpec, VectorStoreBinding,
};
