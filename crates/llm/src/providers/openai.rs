//! OpenAI-compatible HTTP provider.
//!
//! Covers the three API families the dispatcher needs:
//! responses (direct protocol), assistants/threads/runs (job protocol), and
//! files / vector store files (registry and listing).

use crate::client::{AssistantsApi, FilesApi, ResponsesApi};
use crate::types::{
    Assistant, AssistantRequest, FileObject, IndexFilePage, InputMessage, MessageList,
    PrimaryResult, ResponseRequest, Run, Thread, ThreadMessage,
};
use docqa_core::{AppError, AppResult};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Header that opts into the v2 assistants API.
const ASSISTANTS_BETA: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Maximum number of characters of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 300;

/// OpenAI API client.
pub struct OpenAiClient {
    /// Base URL, without trailing slash
    base_url: String,

    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for the given endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, beta: bool) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .bearer_auth(&self.api_key);
        if beta {
            builder.header(ASSISTANTS_BETA.0, ASSISTANTS_BETA.1)
        } else {
            builder
        }
    }

    /// Send a request and return the JSON body of a successful response.
    async fn send(&self, builder: RequestBuilder, path: &str) -> AppResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to send request to {}: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Transport(format!(
                "OpenAI API error ({}) on {}: {}",
                status,
                path,
                truncate(&error_text, MAX_ERROR_BODY)
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read response from {}: {}", path, e)))
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        beta: bool,
    ) -> AppResult<R> {
        let value = self
            .send(self.request(Method::POST, path, beta).json(body), path)
            .await?;
        parse(value, path)
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        beta: bool,
    ) -> AppResult<R> {
        let value = self
            .send(self.request(Method::GET, path, beta).query(query), path)
            .await?;
        parse(value, path)
    }

    async fn delete(&self, path: &str, beta: bool) -> AppResult<()> {
        self.send(self.request(Method::DELETE, path, beta), path)
            .await
            .map(|_| ())
    }
}

fn parse<R: DeserializeOwned>(value: Value, path: &str) -> AppResult<R> {
    serde_json::from_value(value).map_err(|e| {
        AppError::Serialization(format!("Unexpected response shape from {}: {}", path, e))
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[async_trait::async_trait]
impl ResponsesApi for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn create_response(&self, request: &ResponseRequest) -> AppResult<PrimaryResult> {
        tracing::debug!(model = %request.model, "POST /responses");

        let raw = self
            .send(
                self.request(Method::POST, "responses", false).json(request),
                "responses",
            )
            .await?;

        let mut result: PrimaryResult = parse(raw.clone(), "responses")?;
        result.raw = raw;
        Ok(result)
    }
}

#[async_trait::async_trait]
impl AssistantsApi for OpenAiClient {
    async fn create_assistant(&self, request: &AssistantRequest) -> AppResult<Assistant> {
        tracing::debug!(name = %request.name, "POST /assistants");
        self.post_json("assistants", request, true).await
    }

    async fn create_thread(&self) -> AppResult<Thread> {
        self.post_json("threads", &serde_json::json!({}), true).await
    }

    async fn post_message(&self, thread_id: &str, message: &InputMessage) -> AppResult<()> {
        let path = format!("threads/{}/messages", thread_id);
        let _: Value = self.post_json(&path, message, true).await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> AppResult<Run> {
        let path = format!("threads/{}/runs", thread_id);
        self.post_json(
            &path,
            &serde_json::json!({ "assistant_id": assistant_id }),
            true,
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> AppResult<Run> {
        let path = format!("threads/{}/runs/{}", thread_id, run_id);
        self.get_json(&path, &[], true).await
    }

    async fn list_messages(&self, thread_id: &str, limit: u32) -> AppResult<Vec<ThreadMessage>> {
        let path = format!("threads/{}/messages", thread_id);
        let query = [("order", "desc".to_string()), ("limit", limit.to_string())];
        let list: MessageList = self.get_json(&path, &query, true).await?;
        Ok(list.data)
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> AppResult<()> {
        let path = format!("threads/{}/runs/{}/cancel", thread_id, run_id);
        let _: Value = self.post_json(&path, &serde_json::json!({}), true).await?;
        Ok(())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> AppResult<()> {
        self.delete(&format!("assistants/{}", assistant_id), true)
            .await
    }

    async fn delete_thread(&self, thread_id: &str) -> AppResult<()> {
        self.delete(&format!("threads/{}", thread_id), true).await
    }
}

#[async_trait::async_trait]
impl FilesApi for OpenAiClient {
    async fn retrieve_file(&self, file_id: &str) -> AppResult<FileObject> {
        self.get_json(&format!("files/{}", file_id), &[], false)
            .await
    }

    async fn list_index_files(
        &self,
        index_id: &str,
        limit: u32,
        after: Option<&str>,
    ) -> AppResult<IndexFilePage> {
        let path = format!("vector_stores/{}/files", index_id);
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = after {
            query.push(("after", cursor.to_string()));
        }
        self.get_json(&path, &query, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(base_url, "sk-test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_openai_client_creation() {
        let client = client("https://api.openai.com/v1/");
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_url_joining() {
        let client = client("http://localhost:8080/v1");
        assert_eq!(
            client.url("/vector_stores/vs_1/files"),
            "http://localhost:8080/v1/vector_stores/vs_1/files"
        );
        assert_eq!(client.url("responses"), "http://localhost:8080/v1/responses");
    }

    #[test]
    fn test_beta_header_only_when_requested() {
        let client = client("http://localhost:8080/v1");
        let with_beta = client
            .request(Method::GET, "threads/t_1", true)
            .build()
            .unwrap();
        assert_eq!(
            with_beta.headers().get("OpenAI-Beta").unwrap(),
            "assistants=v2"
        );

        let without = client.request(Method::GET, "files/f_1", false).build().unwrap();
        assert!(without.headers().get("OpenAI-Beta").is_none());
        assert!(without.headers().get("authorization").is_some());
    }

    #[test]
    fn test_truncate_error_body() {
        assert_eq!(truncate("short", 10), "short");
        let long = "x".repeat(20);
        assert_eq!(truncate(&long, 5), "xxxxx...");
    }

    #[test]
    fn test_parse_reports_shape_errors() {
        let result: AppResult<Run> = parse(serde_json::json!({"status": 3}), "runs");
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
