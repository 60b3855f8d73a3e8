//! Core types for question answering over an indexed document collection.

use docqa_core::{AppError, AppResult};
use docqa_llm::RunStatus;
use docqa_prompt::NO_EVIDENCE_SENTENCE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Answer text used when the service returned no text at all.
pub const EMPTY_ANSWER_PLACEHOLDER: &str = "(no text)";

/// One question against one index. Validated on construction, immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    model: String,
    index_id: String,
    system_instructions: String,
    user_question: String,
}

impl Query {
    /// Build a query, rejecting blank input before any remote call is made.
    pub fn new(
        model: impl Into<String>,
        index_id: impl Into<String>,
        system_instructions: impl Into<String>,
        user_question: impl Into<String>,
    ) -> AppResult<Self> {
        let query = Self {
            model: model.into(),
            index_id: index_id.into(),
            system_instructions: system_instructions.into(),
            user_question: user_question.into(),
        };

        if query.user_question.trim().is_empty() {
            return Err(AppError::EmptyInput("Please enter a question".to_string()));
        }
        if query.model.trim().is_empty() {
            return Err(AppError::ConfigurationMissing(
                "Model identifier is empty".to_string(),
            ));
        }
        if query.index_id.trim().is_empty() {
            return Err(AppError::ConfigurationMissing(
                "Vector store ID is empty".to_string(),
            ));
        }

        Ok(query)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    pub fn system_instructions(&self) -> &str {
        &self.system_instructions
    }

    pub fn user_question(&self) -> &str {
        &self.user_question
    }
}

/// Protocol that produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Synchronous response request
    Direct,
    /// Assistant/thread/run job
    Job,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Job => "job",
        }
    }
}

/// Answer to one query.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    answer_text: String,
    cited_file_ids: Vec<String>,
    protocol: Protocol,
    #[serde(skip)]
    raw_payload: Value,
}

impl AnswerResult {
    /// Build a result. Empty text becomes [`EMPTY_ANSWER_PLACEHOLDER`];
    /// repeated file ids keep their first position only.
    pub fn new(
        answer_text: impl Into<String>,
        cited_file_ids: Vec<String>,
        raw_payload: Value,
        protocol: Protocol,
    ) -> Self {
        let answer_text = answer_text.into();
        let answer_text = if answer_text.trim().is_empty() {
            EMPTY_ANSWER_PLACEHOLDER.to_string()
        } else {
            answer_text
        };

        let mut seen = HashSet::new();
        let cited_file_ids = cited_file_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        Self {
            answer_text,
            cited_file_ids,
            protocol,
            raw_payload,
        }
    }

    pub fn answer_text(&self) -> &str {
        &self.answer_text
    }

    pub fn cited_file_ids(&self) -> &[String] {
        &self.cited_file_ids
    }

    pub fn raw_payload(&self) -> &Value {
        &self.raw_payload
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Whether the model reported that the files hold no answer.
    ///
    /// This is a normal outcome, not a failure.
    pub fn is_no_evidence(&self) -> bool {
        self.answer_text.trim() == NO_EVIDENCE_SENTENCE
    }

    pub fn has_citations(&self) -> bool {
        !self.cited_file_ids.is_empty()
    }
}

/// A file attached to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub file_id: String,

    /// Display name, or the file id when the lookup failed
    pub filename: String,
}

/// Transient handle on a job-protocol run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRun {
    pub run_id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
}
