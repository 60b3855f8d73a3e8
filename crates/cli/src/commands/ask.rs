//! Ask command handler.
//!
//! Sends one question to the remote index and prints the cited answer.

use super::{parse_mode, print_json, read_system_file};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult, DispatchMode};
use docqa_knowledge::{ask, AskResponse, FileRegistry, QueryDispatcher, Query, MAX_DISPLAY_SOURCES};
use docqa_llm::create_client;
use docqa_prompt::system_instructions;
use std::path::PathBuf;

/// Ask a question against the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also print the raw service payload
    #[arg(long)]
    pub show_raw: bool,

    /// Protocol selection (auto, direct, job)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<DispatchMode>,

    /// Read system instructions from a file instead of the qa.system prompt
    #[arg(long)]
    pub system_file: Option<PathBuf>,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let system_override = read_system_file(self.system_file.as_deref())?;
        let system = system_instructions(&config.workspace, system_override.as_deref())?;

        // Input and configuration are checked before anything goes over the wire
        let query = Query::new(
            config.model.as_str(),
            config.index_id.clone().unwrap_or_default(),
            system,
            self.question.as_str(),
        )?;
        config.validate()?;

        let client = create_client(config)?;
        let mut dispatcher = QueryDispatcher::new(&*client, &*client, config);
        if let Some(mode) = self.mode {
            dispatcher = dispatcher.with_mode(mode);
        }
        let registry = FileRegistry::new(&*client);

        let response = ask(&dispatcher, &registry, &query, MAX_DISPLAY_SOURCES).await?;

        if self.json {
            let mut output = serde_json::to_value(&response)?;
            if self.show_raw {
                output["raw"] = response.raw.clone();
            }
            print_json(&output)
        } else {
            println!("{}", render_text(&response));
            if self.show_raw {
                println!();
                println!("Raw response:");
                println!("{}", serde_json::to_string_pretty(&response.raw)?);
            }
            Ok(())
        }
    }
}

/// Plain-text rendering: the answer, then the cited files.
fn render_text(response: &AskResponse) -> String {
    let mut out = String::new();
    out.push_str(response.answer.trim());
    out.push_str("\n\n");

    if response.sources.is_empty() {
        out.push_str("Sources: (no file citations returned)");
        return out;
    }

    out.push_str("Sources:");
    for source in &response.sources {
        out.push_str("\n- ");
        out.push_str(&source.filename);
    }
    let hidden = response.hidden_sources();
    if hidden > 0 {
        out.push_str(&format!("\n(+{} more)", hidden));
    }
    out
}
