//! Summarize command handler.
//!
//! Produces one cited summary per indexed file and prints a combined report.

use super::{parse_mode, read_system_file};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult, DispatchMode};
use docqa_knowledge::{BatchSummarizer, ProgressReporter, QueryDispatcher};
use docqa_llm::create_client;
use docqa_prompt::{system_instructions, SummaryQuestion};
use std::path::PathBuf;
use std::sync::Arc;

/// Summarize every file in the index
#[derive(Args, Debug)]
pub struct SummarizeCommand {
    /// Summarize at most this many files
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Protocol selection (auto, direct, job)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<DispatchMode>,

    /// Read system instructions from a file instead of the qa.system prompt
    #[arg(long)]
    pub system_file: Option<PathBuf>,
}

impl SummarizeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing summarize command");
        tracing::debug!("Summarize options: {:?}", self);

        let system_override = read_system_file(self.system_file.as_deref())?;
        let system = system_instructions(&config.workspace, system_override.as_deref())?;
        let question = SummaryQuestion::load(&config.workspace)?;

        config.validate()?;
        let index_id = config.require_index_id()?;
        let client = create_client(config)?;

        let mut dispatcher = QueryDispatcher::new(&*client, &*client, config);
        if let Some(mode) = self.mode {
            dispatcher = dispatcher.with_mode(mode);
        }

        // Progress goes to stderr so stdout stays a clean report
        let progress = ProgressReporter::new(Arc::new(|event| {
            eprintln!("{}", event.format_simple());
        }));

        let report = BatchSummarizer::new(&dispatcher, &*client, question)
            .with_progress(progress)
            .with_limit(self.limit)
            .summarize_index(&system, &config.model, index_id)
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", report.render_markdown());
        }

        if report.failed() > 0 {
            tracing::warn!(
                "{} of {} files could not be summarized",
                report.failed(),
                report.summaries.len()
            );
        }

        Ok(())
    }
}
