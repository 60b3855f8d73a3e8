//! In-memory stand-ins for the remote service traits.

use docqa_core::{AppError, AppResult};
use docqa_llm::{
    Assistant, AssistantRequest, AssistantsApi, FileObject, FilesApi, IndexFileEntry,
    IndexFilePage, InputMessage, PrimaryResult, ResponseRequest, ResponsesApi, Run, RunStatus,
    Thread, ThreadMessage,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

type ResponseHandler = Box<dyn Fn(&ResponseRequest) -> AppResult<PrimaryResult> + Send + Sync>;

/// Parse a JSON payload the way the HTTP client does, keeping the raw value.
pub fn primary_result(value: Value) -> PrimaryResult {
    let mut result: PrimaryResult = serde_json::from_value(value.clone()).unwrap();
    result.raw = value;
    result
}

/// Direct-protocol payload with one text item and the given file citations.
pub fn primary_answer(text: &str, file_ids: &[&str]) -> PrimaryResult {
    let annotations: Vec<Value> = file_ids
        .iter()
        .map(|id| serde_json::json!({"type": "file_citation", "file_id": id, "index": 0}))
        .collect();
    primary_result(serde_json::json!({
        "id": "resp_1",
        "output": [
            {"type": "file_search_call", "status": "completed"},
            {"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": text, "annotations": annotations}
            ]}
        ]
    }))
}

/// Assistant message as returned by the message listing.
pub fn assistant_message(text: &str, file_ids: &[&str]) -> ThreadMessage {
    let annotations: Vec<Value> = file_ids
        .iter()
        .map(|id| serde_json::json!({"type": "file_citation", "file_citation": {"file_id": id}}))
        .collect();
    serde_json::from_value(serde_json::json!({
        "id": "msg_a",
        "role": "assistant",
        "content": [{"type": "text", "text": {"value": text, "annotations": annotations}}]
    }))
    .unwrap()
}

pub fn user_message(text: &str) -> ThreadMessage {
    serde_json::from_value(serde_json::json!({
        "id": "msg_u",
        "role": "user",
        "content": [{"type": "text", "text": {"value": text, "annotations": []}}]
    }))
    .unwrap()
}

// ---------------------------------------------------------------------------

pub struct StubResponses {
    handler: ResponseHandler,
    pub requests: Mutex<Vec<ResponseRequest>>,
}

impl StubResponses {
    pub fn new(
        handler: impl Fn(&ResponseRequest) -> AppResult<PrimaryResult> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Rejects every request shape.
    pub fn failing() -> Self {
        Self::new(|_| Err(AppError::Transport("400 unknown parameter".to_string())))
    }

    /// Accepts every request shape with the same answer.
    pub fn answering(text: &str, file_ids: &[&str]) -> Self {
        let result = primary_answer(text, file_ids);
        Self::new(move |_| Ok(result.clone()))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ResponsesApi for StubResponses {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn create_response(&self, request: &ResponseRequest) -> AppResult<PrimaryResult> {
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

// ---------------------------------------------------------------------------

pub struct StubAssistants {
    /// Statuses returned by successive `retrieve_run` calls; the last one repeats
    statuses: Mutex<VecDeque<RunStatus>>,
    messages: Vec<ThreadMessage>,
    fail_create_assistant: bool,
    fail_delete: bool,
    pub calls: Mutex<Vec<String>>,
    pub assistant_requests: Mutex<Vec<AssistantRequest>>,
    pub posted: Mutex<Vec<InputMessage>>,
}

impl StubAssistants {
    pub fn new(statuses: Vec<RunStatus>, messages: Vec<ThreadMessage>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            messages,
            fail_create_assistant: false,
            fail_delete: false,
            calls: Mutex::new(Vec::new()),
            assistant_requests: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
        }
    }

    /// Job protocol that must never be reached.
    pub fn unreachable() -> Self {
        let mut stub = Self::new(vec![RunStatus::Failed], Vec::new());
        stub.fail_create_assistant = true;
        stub
    }

    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

#[async_trait::async_trait]
impl AssistantsApi for StubAssistants {
    async fn create_assistant(&self, request: &AssistantRequest) -> AppResult<Assistant> {
        self.record("create_assistant");
        if self.fail_create_assistant {
            return Err(AppError::Transport("assistants unavailable".to_string()));
        }
        self.assistant_requests.lock().unwrap().push(request.clone());
        Ok(Assistant {
            id: "asst_1".to_string(),
        })
    }

    async fn create_thread(&self) -> AppResult<Thread> {
        self.record("create_thread");
        Ok(Thread {
            id: "thread_1".to_string(),
        })
    }

    async fn post_message(&self, _thread_id: &str, message: &InputMessage) -> AppResult<()> {
        self.record("post_message");
        self.posted.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> AppResult<Run> {
        self.record("create_run");
        Ok(Run {
            id: "run_1".to_string(),
            thread_id: Some(thread_id.to_string()),
            assistant_id: Some(assistant_id.to_string()),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> AppResult<Run> {
        self.record("retrieve_run");
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap_or(RunStatus::Unknown)
        } else {
            statuses.front().copied().unwrap_or(RunStatus::Unknown)
        };
        Ok(Run {
            id: run_id.to_string(),
            thread_id: Some(thread_id.to_string()),
            assistant_id: None,
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, _thread_id: &str, limit: u32) -> AppResult<Vec<ThreadMessage>> {
        self.record("list_messages");
        Ok(self.messages.iter().take(limit as usize).cloned().collect())
    }

    async fn cancel_run(&self, _thread_id: &str, _run_id: &str) -> AppResult<()> {
        self.record("cancel_run");
        Ok(())
    }

    async fn delete_assistant(&self, _assistant_id: &str) -> AppResult<()> {
        self.record("delete_assistant");
        if self.fail_delete {
            return Err(AppError::Transport("404 not found".to_string()));
        }
        Ok(())
    }

    async fn delete_thread(&self, _thread_id: &str) -> AppResult<()> {
        self.record("delete_thread");
        if self.fail_delete {
            return Err(AppError::Transport("404 not found".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------

pub struct StubFiles {
    names: HashMap<String, Option<String>>,
    pages: Mutex<VecDeque<IndexFilePage>>,
    pub cursors: Mutex<Vec<Option<String>>>,
    pub lookups: Mutex<Vec<String>>,
}

impl StubFiles {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            pages: Mutex::new(VecDeque::new()),
            cursors: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Register a file; ids never registered fail lookup with "not found".
    pub fn with_file(mut self, file_id: &str, filename: Option<&str>) -> Self {
        self.names
            .insert(file_id.to_string(), filename.map(String::from));
        self
    }

    pub fn with_page(self, ids: &[String], has_more: bool) -> Self {
        self.pages.lock().unwrap().push_back(IndexFilePage {
            data: ids
                .iter()
                .map(|id| IndexFileEntry {
                    id: id.clone(),
                    status: Some("completed".to_string()),
                })
                .collect(),
            has_more,
            last_id: ids.last().cloned(),
        });
        self
    }

    pub fn with_raw_page(self, page: IndexFilePage) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }
}

#[async_trait::async_trait]
impl FilesApi for StubFiles {
    async fn retrieve_file(&self, file_id: &str) -> AppResult<FileObject> {
        self.lookups.lock().unwrap().push(file_id.to_string());
        match self.names.get(file_id) {
            Some(filename) => Ok(FileObject {
                id: file_id.to_string(),
                filename: filename.clone(),
                bytes: None,
            }),
            None => Err(AppError::Transport(format!(
                "OpenAI API error (404 Not Found) on files/{}",
                file_id
            ))),
        }
    }

    async fn list_index_files(
        &self,
        _index_id: &str,
        _limit: u32,
        after: Option<&str>,
    ) -> AppResult<IndexFilePage> {
        self.cursors.lock().unwrap().push(after.map(String::from));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Transport("no more pages".to_string()))
    }
}
