//! Per-file summaries of every document in an index.
//!
//! Files are summarized one at a time in listing order. A failed file is
//! recorded in the report and the batch moves on.

use crate::dispatch::QueryDispatcher;
use crate::lister::IndexLister;
use crate::progress::ProgressReporter;
use crate::registry::FileRegistry;
use crate::types::{AnswerResult, IndexedFile, Query};
use chrono::{DateTime, Utc};
use docqa_core::{AppError, AppResult};
use docqa_llm::FilesApi;
use docqa_prompt::SummaryQuestion;
use serde::Serialize;
use std::fmt::Write as _;

/// Result of summarizing one file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SummaryOutcome {
    Answered(AnswerResult),
    Failed { kind: String, message: String },
}

impl SummaryOutcome {
    fn from_error(err: &AppError) -> Self {
        Self::Failed {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub file: IndexedFile,
    pub outcome: SummaryOutcome,

    /// Display names of the cited files
    pub sources: Vec<String>,
}

impl FileSummary {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, SummaryOutcome::Answered(_))
    }

    pub fn answer(&self) -> Option<&AnswerResult> {
        match &self.outcome {
            SummaryOutcome::Answered(answer) => Some(answer),
            SummaryOutcome::Failed { .. } => None,
        }
    }
}

/// Combined outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub index_id: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub summaries: Vec<FileSummary>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.summaries.iter().filter(|s| s.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.summaries.len() - self.succeeded()
    }

    /// Markdown document with one section per file.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Document summaries\n");
        let _ = writeln!(out, "- Index: `{}`", self.index_id);
        let _ = writeln!(out, "- Model: `{}`", self.model);
        let _ = writeln!(
            out,
            "- Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(
            out,
            "- Files: {} ({} succeeded, {} failed)",
            self.summaries.len(),
            self.succeeded(),
            self.failed()
        );

        if self.summaries.is_empty() {
            let _ = writeln!(out, "\nNo files are attached to this index.");
            return out;
        }

        for (i, summary) in self.summaries.iter().enumerate() {
            let _ = writeln!(out, "\n## {}. {}\n", i + 1, summary.file.filename);
            match &summary.outcome {
                SummaryOutcome::Answered(answer) => {
                    let _ = writeln!(out, "{}\n", answer.answer_text().trim());
                    if summary.sources.is_empty() {
                        let _ = writeln!(out, "Sources: (no file citations returned)");
                    } else {
                        let _ = writeln!(out, "Sources: {}", summary.sources.join(", "));
                    }
                }
                SummaryOutcome::Failed { kind, message } => {
                    let _ = writeln!(out, "> Summary failed ({}): {}", kind, message);
                }
            }
        }

        out
    }
}

/// Summarizes each file of an index through the query dispatcher.
pub struct BatchSummarizer<'a> {
    dispatcher: &'a QueryDispatcher<'a>,
    files: &'a dyn FilesApi,
    question: SummaryQuestion,
    progress: ProgressReporter,
    limit: Option<usize>,
}

impl<'a> BatchSummarizer<'a> {
    pub fn new(
        dispatcher: &'a QueryDispatcher<'a>,
        files: &'a dyn FilesApi,
        question: SummaryQuestion,
    ) -> Self {
        Self {
            dispatcher,
            files,
            question,
            progress: ProgressReporter::noop(),
            limit: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Summarize at most `limit` files.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// List the index, then summarize its files.
    pub async fn summarize_index(
        &self,
        system_instructions: &str,
        model: &str,
        index_id: &str,
    ) -> AppResult<BatchReport> {
        let files = IndexLister::new(self.files).list_files(index_id).await?;
        self.progress.listed(files.len() as u64, index_id);
        self.summarize(system_instructions, model, index_id, &files)
            .await
    }

    /// Summarize the given files in order.
    ///
    /// Fails only on configuration problems; per-file failures are recorded.
    pub async fn summarize(
        &self,
        system_instructions: &str,
        model: &str,
        index_id: &str,
        files: &[IndexedFile],
    ) -> AppResult<BatchReport> {
        if model.trim().is_empty() {
            return Err(AppError::ConfigurationMissing(
                "Model identifier is empty".to_string(),
            ));
        }
        if index_id.trim().is_empty() {
            return Err(AppError::ConfigurationMissing(
                "Vector store ID is empty".to_string(),
            ));
        }

        let selected = match self.limit {
            Some(limit) => &files[..limit.min(files.len())],
            None => files,
        };
        let total = selected.len() as u64;
        tracing::info!("Summarizing {} files from index {}", total, index_id);

        let registry = FileRegistry::new(self.files);
        let mut summaries = Vec::with_capacity(selected.len());

        for (i, file) in selected.iter().enumerate() {
            let summary = match self
                .summarize_one(system_instructions, model, index_id, file)
                .await
            {
                Ok(answer) => {
                    let sources = registry.resolve_all(answer.cited_file_ids()).await;
                    FileSummary {
                        file: file.clone(),
                        outcome: SummaryOutcome::Answered(answer),
                        sources,
                    }
                }
                Err(e) => {
                    tracing::warn!("Summary of {} failed: {}", file.filename, e);
                    FileSummary {
                        file: file.clone(),
                        outcome: SummaryOutcome::from_error(&e),
                        sources: Vec::new(),
                    }
                }
            };

            self.progress
                .summarized(i as u64 + 1, total, &file.filename, summary.is_ok());
            summaries.push(summary);
        }

        Ok(BatchReport {
            index_id: index_id.to_string(),
            model: model.to_string(),
            generated_at: Utc::now(),
            summaries,
        })
    }

    async fn summarize_one(
        &self,
        system_instructions: &str,
        model: &str,
        index_id: &str,
        file: &IndexedFile,
    ) -> AppResult<AnswerResult> {
        let question = self.question.render(&file.filename)?;
        let query = Query::new(model, index_id, system_instructions, question)?;
        self.dispatcher.dispatch(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::stubs::{primary_answer, StubAssistants, StubFiles, StubResponses};
    use crate::types::Protocol;
    use docqa_core::{AppConfig, DispatchMode};
    use docqa_prompt::{PromptDefinition, NO_EVIDENCE_SENTENCE};

    fn question() -> SummaryQuestion {
        SummaryQuestion::from_definition(PromptDefinition {
            id: "summary.file".to_string(),
            title: "Summary".to_string(),
            api_version: "v1".to_string(),
            created_by: String::new(),
            variables: vec!["filename".to_string()],
            template: "Summarize {{filename}}.".to_string(),
        })
    }

    fn indexed(id: &str, name: &str) -> IndexedFile {
        IndexedFile {
            file_id: id.to_string(),
            filename: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_limit_restricts_batch() {
        let responses = StubResponses::answering("Short summary.", &[]);
        let assistants = StubAssistants::unreachable();
        let files = StubFiles::new();
        let config = AppConfig {
            mode: DispatchMode::Direct,
            ..AppConfig::default()
        };
        let dispatcher = QueryDispatcher::new(&responses, &assistants, &config);

        let all = vec![indexed("f_1", "a.pdf"), indexed("f_2", "b.pdf")];
        let report = BatchSummarizer::new(&dispatcher, &files, question())
            .with_limit(Some(1))
            .summarize("sys", "gpt-4o-mini", "vs_1", &all)
            .await
            .unwrap();

        assert_eq!(report.summaries.len(), 1);
        assert_eq!(responses.request_count(), 1);
        let requests = responses.requests.lock().unwrap();
        assert_eq!(requests[0].input[1].content, "Summarize a.pdf.");
    }

    #[tokio::test]
    async fn test_sources_are_resolved() {
        let responses = StubResponses::new(|_| Ok(primary_answer("About imaging.", &["f_1"])));
        let assistants = StubAssistants::unreachable();
        let files = StubFiles::new().with_file("f_1", Some("a.pdf"));
        let config = AppConfig::default();
        let dispatcher = QueryDispatcher::new(&responses, &assistants, &config);

        let report = BatchSummarizer::new(&dispatcher, &files, question())
            .summarize("sys", "gpt-4o-mini", "vs_1", &[indexed("f_1", "a.pdf")])
            .await
            .unwrap();

        assert_eq!(report.summaries[0].sources, vec!["a.pdf"]);
        assert_eq!(
            report.summaries[0].answer().map(|a| a.protocol()),
            Some(Protocol::Direct)
        );
    }

    #[tokio::test]
    async fn test_blank_model_rejected_before_dispatch() {
        let responses = StubResponses::answering("unused", &[]);
        let assistants = StubAssistants::unreachable();
        let files = StubFiles::new();
        let config = AppConfig::default();
        let dispatcher = QueryDispatcher::new(&responses, &assistants, &config);

        let err = BatchSummarizer::new(&dispatcher, &files, question())
            .summarize("sys", " ", "vs_1", &[indexed("f_1", "a.pdf")])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationMissing(_)));
        assert_eq!(responses.request_count(), 0);
    }

    #[test]
    fn test_render_markdown_sections() {
        let answered = AnswerResult::new(
            NO_EVIDENCE_SENTENCE,
            vec![],
            serde_json::Value::Null,
            Protocol::Direct,
        );
        let report = BatchReport {
            index_id: "vs_1".to_string(),
            model: "gpt-4o-mini".to_string(),
            generated_at: Utc::now(),
            summaries: vec![
                FileSummary {
                    file: indexed("f_1", "a.pdf"),
                    outcome: SummaryOutcome::Answered(answered),
                    sources: vec![],
                },
                FileSummary {
                    file: indexed("f_2", "b.pdf"),
                    outcome: SummaryOutcome::Failed {
                        kind: "transport_failure".to_string(),
                        message: "Transport error: 500".to_string(),
                    },
                    sources: vec![],
                },
            ],
        };

        let text = report.render_markdown();
        assert!(text.contains("- Files: 2 (1 succeeded, 1 failed)"));
        assert!(text.contains("## 1. a.pdf"));
        assert!(text.contains(NO_EVIDENCE_SENTENCE));
        assert!(text.contains("Sources: (no file citations returned)"));
        assert!(text.contains("## 2. b.pdf"));
        assert!(text.contains("> Summary failed (transport_failure): Transport error: 500"));
    }

    #[test]
    fn test_report_serializes_outcome_status() {
        let report = BatchReport {
            index_id: "vs_1".to_string(),
            model: "m".to_string(),
            generated_at: Utc::now(),
            summaries: vec![FileSummary {
                file: indexed("f_2", "b.pdf"),
                outcome: SummaryOutcome::Failed {
                    kind: "run_timeout".to_string(),
                    message: "late".to_string(),
                },
                sources: vec![],
            }],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summaries"][0]["outcome"]["status"], "failed");
        assert_eq!(value["summaries"][0]["outcome"]["kind"], "run_timeout");
    }
}
