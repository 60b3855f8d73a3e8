//! Prompt system for DocQA.
//!
//! This crate provides:
//! - Built-in system instructions and the per-file summary question
//! - Workspace overrides loaded from `.docqa/prompts/*.yml`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{render_prompt, system_instructions, SummaryQuestion};
pub use builtin::{NO_EVIDENCE_SENTENCE, QA_SYSTEM, SUMMARY_FILE};
pub use loader::{list_prompts, load_prompt};
pub use types::{PromptDefinition, PromptEntry, PromptSource};
