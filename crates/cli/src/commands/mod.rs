//! Command handlers for the DocQA CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod files;
pub mod prompts;
pub mod summarize;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use files::FilesCommand;
pub use prompts::PromptsCommand;
pub use summarize::SummarizeCommand;

use docqa_core::{AppError, AppResult, DispatchMode};
use std::path::Path;

/// clap value parser for `--mode`.
pub(crate) fn parse_mode(s: &str) -> Result<DispatchMode, String> {
    DispatchMode::parse(s).ok_or_else(|| format!("unknown mode '{}' (auto, direct, job)", s))
}

/// Read system instructions from a file, if one was given.
pub(crate) fn read_system_file(path: Option<&Path>) -> AppResult<Option<String>> {
    match path {
        Some(path) => std::fs::read_to_string(path).map(Some).map_err(|e| {
            AppError::Config(format!(
                "Failed to read system instructions from {}: {}",
                path.display(),
                e
            ))
        }),
        None => Ok(None),
    }
}

pub(crate) fn print_json(value: &serde_json::Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("job"), Ok(DispatchMode::Job));
        assert_eq!(parse_mode("Direct"), Ok(DispatchMode::Direct));
        assert!(parse_mode("sometimes").is_err());
    }

    #[test]
    fn test_read_system_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("system.txt");
        std::fs::write(&path, "Answer in French.").unwrap();

        assert_eq!(
            read_system_file(Some(&path)).unwrap().as_deref(),
            Some("Answer in French.")
        );
        assert!(read_system_file(None).unwrap().is_none());
        assert!(read_system_file(Some(&dir.path().join("missing.txt"))).is_err());
    }
}
