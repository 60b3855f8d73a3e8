//! Error types for the DocQA CLI.
//!
//! This module defines a unified error enum covering configuration, input
//! validation, transport, and the terminal outcomes of the query dispatch
//! protocols.

use thiserror::Error;

/// Unified error type for DocQA.
///
/// All fallible functions return `Result<T, AppError>`. Errors with a local
/// recovery path (shape fallback, file-name lookup fallback, per-file batch
/// continuation) are handled where they occur and never reach the caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed configuration (unreadable file, invalid value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential or identifier is absent
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    /// Blank user input
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single remote call failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Every primary request shape failed and no fallback produced an answer
    #[error("All request shapes failed: {last_error}{}", fallback_note(.fallback_error))]
    AllShapesFailed {
        /// Error from the last primary shape attempted
        last_error: String,
        /// Error from the job protocol, when it was attempted
        fallback_error: Option<String>,
    },

    /// The job run did not reach a terminal status before the deadline
    #[error("Run {run_id} did not finish within {waited_secs}s")]
    RunTimeout { run_id: String, waited_secs: u64 },

    /// The job run reached a terminal status other than `completed`
    #[error("Run {run_id} ended with status '{status}'")]
    RunUnsuccessful { run_id: String, status: String },

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

fn fallback_note(fallback_error: &Option<String>) -> String {
    match fallback_error {
        Some(err) => format!("; job fallback failed: {}", err),
        None => String::new(),
    }
}

impl AppError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "configuration_invalid",
            AppError::ConfigurationMissing(_) => "configuration_missing",
            AppError::EmptyInput(_) => "empty_input",
            AppError::Io(_) => "io",
            AppError::Transport(_) => "transport_failure",
            AppError::AllShapesFailed { .. } => "all_shapes_failed",
            AppError::RunTimeout { .. } => "run_timeout",
            AppError::RunUnsuccessful { .. } => "run_unsuccessful",
            AppError::Prompt(_) => "prompt",
            AppError::Serialization(_) => "serialization",
            AppError::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_unsuccessful_names_status() {
        let err = AppError::RunUnsuccessful {
            run_id: "run_1".to_string(),
            status: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "Run run_1 ended with status 'failed'");
        assert_eq!(err.kind(), "run_unsuccessful");
    }

    #[test]
    fn test_timeout_is_distinct_from_unsuccessful() {
        let timeout = AppError::RunTimeout {
            run_id: "run_1".to_string(),
            waited_secs: 360,
        };
        assert_eq!(timeout.kind(), "run_timeout");
        assert!(timeout.to_string().contains("360s"));
    }

    #[test]
    fn test_all_shapes_failed_includes_fallback_error() {
        let direct_only = AppError::AllShapesFailed {
            last_error: "400 unknown parameter".to_string(),
            fallback_error: None,
        };
        assert_eq!(
            direct_only.to_string(),
            "All request shapes failed: 400 unknown parameter"
        );

        let with_fallback = AppError::AllShapesFailed {
            last_error: "400 unknown parameter".to_string(),
            fallback_error: Some("assistants unavailable".to_string()),
        };
        assert_eq!(
            with_fallback.to_string(),
            "All request shapes failed: 400 unknown parameter; job fallback failed: assistants unavailable"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
