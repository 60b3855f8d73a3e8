//! Wire types for the OpenAI-compatible retrieval service.
//!
//! Response types keep every field the dispatcher inspects as an `Option` so
//! partial payloads deserialize; a payload whose structure does not match at
//! all fails at deserialization instead of deep inside citation extraction.
//! Annotations are the exception: each one is parsed on its own and entries
//! that do not fit are dropped, so one bad citation never costs the answer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Annotation kind that marks a citation of an indexed file.
pub const FILE_CITATION: &str = "file_citation";

/// Tool kind that enables retrieval against a vector store.
pub const FILE_SEARCH: &str = "file_search";

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Role-tagged message sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

impl InputMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Tool definition. Extension fields are merged into the tool object verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub extension: Map<String, Value>,
}

impl ToolSpec {
    pub fn file_search() -> Self {
        Self {
            kind: FILE_SEARCH.to_string(),
            extension: Map::new(),
        }
    }
}

/// Binding of a request to one or more vector stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreBinding {
    pub vector_store_ids: Vec<String>,
}

impl VectorStoreBinding {
    pub fn single(index_id: impl Into<String>) -> Self {
        Self {
            vector_store_ids: vec![index_id.into()],
        }
    }
}

/// `tool_resources` wrapper used by the assistants API and older response shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResources {
    pub file_search: VectorStoreBinding,
}

/// Citation annotation attached to generated text.
///
/// The cited file id appears either nested under `file_citation` or
/// directly on the annotation, depending on the API generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub file_citation: Option<FileCitation>,

    #[serde(default)]
    pub file_id: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

impl Annotation {
    /// File id if this is a well-formed file citation.
    pub fn cited_file_id(&self) -> Option<&str> {
        if self.kind.as_deref() != Some(FILE_CITATION) {
            return None;
        }
        self.file_citation
            .as_ref()
            .and_then(|fc| fc.file_id.as_deref())
            .or(self.file_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileCitation {
    #[serde(default)]
    pub file_id: Option<String>,
}

/// Annotation list that keeps only the entries which parse as [`Annotation`].
/// A value that is not a list at all counts as no annotations.
fn lenient_annotations<'de, D>(deserializer: D) -> Result<Option<Vec<Annotation>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(None),
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

// ---------------------------------------------------------------------------
// Direct protocol: POST /responses
// ---------------------------------------------------------------------------

/// Request body for the direct protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRequest {
    pub model: String,

    pub input: Vec<InputMessage>,

    pub tools: Vec<ToolSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_search: Option<VectorStoreBinding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

impl ResponseRequest {
    /// Request with system and user messages and retrieval enabled, but no index binding.
    pub fn new(model: impl Into<String>, system: &str, question: &str) -> Self {
        Self {
            model: model.into(),
            input: vec![
                InputMessage::system(system.trim()),
                InputMessage::user(question.trim()),
            ],
            tools: vec![ToolSpec::file_search()],
            file_search: None,
            tool_resources: None,
        }
    }

    /// The retrieval tool entry, if the request carries one.
    pub fn file_search_tool_mut(&mut self) -> Option<&mut ToolSpec> {
        self.tools.iter_mut().find(|t| t.kind == FILE_SEARCH)
    }
}

/// Parsed result of the direct protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryResult {
    #[serde(default)]
    pub id: Option<String>,

    /// Aggregate text, when the service provides it
    #[serde(default)]
    pub output_text: Option<String>,

    #[serde(default)]
    pub output: Option<Vec<OutputBlock>>,

    /// Payload as received, kept for diagnostics
    #[serde(skip)]
    pub raw: Value,
}

/// One structured output block (message, tool call, reasoning, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputBlock {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Option<Vec<OutputContent>>,

    /// Older payloads nest the content one level deeper
    #[serde(default)]
    pub message: Option<NestedMessage>,
}

impl OutputBlock {
    /// Content items, from whichever level the payload placed them at.
    pub fn content_items(&self) -> &[OutputContent] {
        self.content
            .as_deref()
            .or_else(|| self.message.as_ref().and_then(|m| m.content.as_deref()))
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestedMessage {
    #[serde(default)]
    pub content: Option<Vec<OutputContent>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_annotations")]
    pub annotations: Option<Vec<Annotation>>,
}

// ---------------------------------------------------------------------------
// Job protocol: assistants, threads, runs, messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AssistantRequest {
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
    pub tool_resources: ToolResources,
}

impl AssistantRequest {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        instructions: &str,
        index_id: &str,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            instructions: instructions.trim().to_string(),
            tools: vec![ToolSpec::file_search()],
            tool_resources: ToolResources {
                file_search: VectorStoreBinding::single(index_id),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Run status as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    Incomplete,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether polling should stop at this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Expired | Self::Incomplete
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Incomplete => "incomplete",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,

    #[serde(default)]
    pub thread_id: Option<String>,

    #[serde(default)]
    pub assistant_id: Option<String>,

    pub status: RunStatus,

    #[serde(default)]
    pub last_error: Option<RunError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Message stored on a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadMessage {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Option<Vec<MessageContent>>,
}

impl ThreadMessage {
    pub fn is_assistant(&self) -> bool {
        self.role.as_deref() == Some("assistant")
    }

    /// Text content items of this message.
    pub fn text_items(&self) -> impl Iterator<Item = &MessageText> {
        self.content
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter(|c| c.kind.as_deref() == Some("text"))
            .filter_map(|c| c.text.as_ref())
    }

    /// First text value carried by this message.
    pub fn first_text(&self) -> Option<&str> {
        self.text_items().find_map(|t| t.value.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub text: Option<MessageText>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageText {
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "lenient_annotations")]
    pub annotations: Option<Vec<Annotation>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
}

// ---------------------------------------------------------------------------
// Files and vector store listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Entry of a vector store's file listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexFileEntry {
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,
}

/// One page of a vector store's file listing.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexFilePage {
    #[serde(default)]
    pub data: Vec<IndexFileEntry>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub last_id: Option<String>,
}
