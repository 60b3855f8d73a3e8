//! DocQA Core Library
//!
//! This crate provides the foundational utilities for the DocQA CLI:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, DispatchMode, PollPolicy};
pub use error::{AppError, AppResult};
