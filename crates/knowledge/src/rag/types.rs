//! Answer types returned to callers.

use crate::types::Protocol;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of sources shown alongside an answer.
pub const MAX_DISPLAY_SOURCES: usize = 5;

/// A cited file, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub file_id: String,

    /// Display name, or the file id when the lookup failed
    pub filename: String,
}

/// Answer to a single question with resolved sources.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,

    /// Cited files with display names, capped for display
    pub sources: Vec<SourceRef>,

    /// Every cited file id, in citation order
    pub file_ids: Vec<String>,

    pub protocol: Protocol,

    /// The model reported that the files hold no answer
    pub no_evidence: bool,

    /// Raw service payload for diagnostics
    #[serde(skip)]
    pub raw: Value,
}

impl AskResponse {
    /// Cited files beyond the display cap.
    pub fn hidden_sources(&self) -> usize {
        self.file_ids.len().saturating_sub(self.sources.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_response_serialization() {
        let response = AskResponse {
            answer: "Confocal microscopy.".to_string(),
            sources: vec![SourceRef {
                file_id: "f_1".to_string(),
                filename: "paperA.pdf".to_string(),
            }],
            file_ids: vec!["f_1".to_string()],
            protocol: Protocol::Direct,
            no_evidence: false,
            raw: serde_json::json!({"id": "resp_1"}),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["fileIds"], serde_json::json!(["f_1"]));
        assert_eq!(value["noEvidence"], false);
        assert_eq!(value["protocol"], "direct");
        assert_eq!(value["sources"][0]["filename"], "paperA.pdf");
        assert!(value.get("raw").is_none());
    }

    #[test]
    fn test_hidden_sources() {
        let response = AskResponse {
            answer: String::new(),
            sources: vec![],
            file_ids: vec!["a".to_string(), "b".to_string()],
            protocol: Protocol::Job,
            no_evidence: false,
            raw: Value::Null,
        };
        assert_eq!(response.hidden_sources(), 2);
    }
}
