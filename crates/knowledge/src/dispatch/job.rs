//! Job protocol: ephemeral assistant, thread, run, poll, harvest.

use crate::citations::extract_thread_citations;
use crate::types::{AnswerResult, JobRun, Protocol, Query};
use docqa_core::{AppError, AppResult, PollPolicy};
use docqa_llm::{AssistantRequest, AssistantsApi, InputMessage, RunStatus, ThreadMessage};
use tokio::time::{sleep, Instant};

/// Messages fetched after a run completes, newest first.
pub const HARVEST_MESSAGE_LIMIT: u32 = 5;

const ASSISTANT_NAME_PREFIX: &str = "docqa";

/// Runs one query through the job protocol.
pub struct JobRunner<'a> {
    assistants: &'a dyn AssistantsApi,
    policy: &'a PollPolicy,
    cleanup: bool,
}

impl<'a> JobRunner<'a> {
    pub fn new(assistants: &'a dyn AssistantsApi, policy: &'a PollPolicy, cleanup: bool) -> Self {
        Self {
            assistants,
            policy,
            cleanup,
        }
    }

    pub async fn run(&self, query: &Query) -> AppResult<AnswerResult> {
        let name = format!("{}-{}", ASSISTANT_NAME_PREFIX, uuid::Uuid::new_v4());
        let request = AssistantRequest::new(
            name,
            query.model(),
            query.system_instructions(),
            query.index_id(),
        );

        let assistant = self.assistants.create_assistant(&request).await?;
        tracing::debug!("Created assistant {}", assistant.id);

        let mut thread_id = None;
        let outcome = self.converse(query, &assistant.id, &mut thread_id).await;

        if self.cleanup {
            self.teardown(&assistant.id, thread_id.as_deref()).await;
        }

        outcome
    }

    async fn converse(
        &self,
        query: &Query,
        assistant_id: &str,
        thread_slot: &mut Option<String>,
    ) -> AppResult<AnswerResult> {
        let thread = self.assistants.create_thread().await?;
        *thread_slot = Some(thread.id.clone());

        self.assistants
            .post_message(&thread.id, &InputMessage::user(query.user_question().trim()))
            .await?;

        let run = self.assistants.create_run(&thread.id, assistant_id).await?;
        let job = JobRun {
            run_id: run.id,
            thread_id: thread.id,
            assistant_id: assistant_id.to_string(),
            status: run.status,
        };
        tracing::info!("Started run {} on thread {}", job.run_id, job.thread_id);

        let job = self.poll(job).await?;
        if job.status != RunStatus::Completed {
            return Err(AppError::RunUnsuccessful {
                run_id: job.run_id,
                status: job.status.as_str().to_string(),
            });
        }

        let messages = self
            .assistants
            .list_messages(&job.thread_id, HARVEST_MESSAGE_LIMIT)
            .await?;

        harvest(&messages)
    }

    /// Poll until the run is terminal or the deadline passes.
    async fn poll(&self, mut job: JobRun) -> AppResult<JobRun> {
        let started = Instant::now();
        let deadline = self.policy.deadline();
        let mut interval = self.policy.initial_interval();
        let mut polls = 0u32;

        loop {
            if job.status.is_terminal() {
                tracing::info!(
                    "Run {} finished with status {} after {} polls",
                    job.run_id,
                    job.status.as_str(),
                    polls
                );
                return Ok(job);
            }

            let elapsed = started.elapsed();
            if elapsed >= deadline {
                if self.cleanup {
                    if let Err(e) = self.assistants.cancel_run(&job.thread_id, &job.run_id).await {
                        tracing::warn!("Failed to cancel run {}: {}", job.run_id, e);
                    }
                }
                return Err(AppError::RunTimeout {
                    run_id: job.run_id,
                    waited_secs: elapsed.as_secs(),
                });
            }

            sleep(interval.min(deadline - elapsed)).await;
            interval = self.policy.next_interval(interval);

            let run = self
                .assistants
                .retrieve_run(&job.thread_id, &job.run_id)
                .await?;
            polls += 1;
            job.status = run.status;

            tracing::debug!(
                run_id = %job.run_id,
                status = job.status.as_str(),
                poll = polls,
                next_interval_secs = interval.as_secs_f64(),
                "Polled run"
            );
        }
    }

    async fn teardown(&self, assistant_id: &str, thread_id: Option<&str>) {
        if let Some(thread_id) = thread_id {
            if let Err(e) = self.assistants.delete_thread(thread_id).await {
                tracing::warn!("Failed to delete thread {}: {}", thread_id, e);
            }
        }
        if let Err(e) = self.assistants.delete_assistant(assistant_id).await {
            tracing::warn!("Failed to delete assistant {}: {}", assistant_id, e);
        }
    }
}

/// Answer from the newest assistant message carrying text.
fn harvest(messages: &[ThreadMessage]) -> AppResult<AnswerResult> {
    let text = messages
        .iter()
        .filter(|message| message.is_assistant())
        .find_map(ThreadMessage::first_text)
        .unwrap_or_default()
        .to_string();

    let cited = extract_thread_citations(messages);
    let raw = serde_json::to_value(messages)?;

    Ok(AnswerResult::new(text, cited, raw, Protocol::Job))
}
