//! Query dispatch across the direct and job protocols.
//!
//! The direct protocol is tried with each request shape in order. When every
//! shape fails (and the mode allows it) the job protocol runs instead.

pub mod job;
pub mod shapes;

pub use job::JobRunner;
pub use shapes::{
    default_shapes, ExtensionBodyBinding, RequestShape, ToolResourcesBinding, TopLevelBinding,
};

use crate::citations::{aggregate_output_text, extract_primary_citations};
use crate::types::{AnswerResult, Protocol, Query};
use docqa_core::{AppConfig, AppError, AppResult, DispatchMode, PollPolicy};
use docqa_llm::{AssistantsApi, ResponsesApi};

/// Answers queries against a remote index.
pub struct QueryDispatcher<'a> {
    responses: &'a dyn ResponsesApi,
    assistants: &'a dyn AssistantsApi,
    shapes: Vec<Box<dyn RequestShape>>,
    mode: DispatchMode,
    policy: PollPolicy,
    cleanup: bool,
}

impl<'a> QueryDispatcher<'a> {
    pub fn new(
        responses: &'a dyn ResponsesApi,
        assistants: &'a dyn AssistantsApi,
        config: &AppConfig,
    ) -> Self {
        Self {
            responses,
            assistants,
            shapes: default_shapes(),
            mode: config.mode,
            policy: config.polling,
            cleanup: config.cleanup,
        }
    }

    /// Replace the ordered list of request shapes.
    pub fn with_shapes(mut self, shapes: Vec<Box<dyn RequestShape>>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Answer one query.
    ///
    /// Fails only once every protocol the mode allows has failed.
    pub async fn dispatch(&self, query: &Query) -> AppResult<AnswerResult> {
        tracing::info!(
            mode = self.mode.as_str(),
            index_id = query.index_id(),
            model = query.model(),
            "Dispatching query"
        );

        match self.mode {
            DispatchMode::Direct => self.dispatch_direct(query).await,
            DispatchMode::Job => self.job_runner().run(query).await,
            DispatchMode::Auto => {
                let last_error = match self.dispatch_direct(query).await {
                    Ok(result) => return Ok(result),
                    Err(AppError::AllShapesFailed { last_error, .. }) => last_error,
                    Err(other) => other.to_string(),
                };
                tracing::warn!(
                    "Direct protocol exhausted ({}), falling back to job protocol",
                    last_error
                );

                match self.job_runner().run(query).await {
                    Ok(result) => Ok(result),
                    Err(e @ (AppError::RunTimeout { .. } | AppError::RunUnsuccessful { .. })) => {
                        Err(e)
                    }
                    Err(e) => Err(AppError::AllShapesFailed {
                        last_error,
                        fallback_error: Some(e.to_string()),
                    }),
                }
            }
        }
    }

    async fn dispatch_direct(&self, query: &Query) -> AppResult<AnswerResult> {
        let mut last_error = String::from("no request shapes configured");

        for shape in &self.shapes {
            let request = shape.build(query);
            tracing::debug!(
                "Trying request shape {} via {}",
                shape.name(),
                self.responses.provider_name()
            );

            match self.responses.create_response(&request).await {
                Ok(result) => {
                    tracing::info!("Request shape {} succeeded", shape.name());
                    let text = aggregate_output_text(&result);
                    let cited = extract_primary_citations(&result);
                    return Ok(AnswerResult::new(text, cited, result.raw, Protocol::Direct));
                }
                Err(e) => {
                    tracing::debug!("Request shape {} failed: {}", shape.name(), e);
                    last_error = e.to_string();
                }
            }
        }

        Err(AppError::AllShapesFailed {
            last_error,
            fallback_error: None,
        })
    }

    fn job_runner(&self) -> JobRunner<'_> {
        JobRunner::new(self.assistants, &self.policy, self.cleanup)
    }
}
