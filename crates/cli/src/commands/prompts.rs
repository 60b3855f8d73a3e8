//! Prompts command handler.

use super::print_json;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_prompt::{list_prompts, PromptSource};

/// List available prompts
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompts command");

        let prompts = list_prompts(&config.workspace)?;

        if self.json {
            return print_json(&serde_json::to_value(&prompts)?);
        }

        for entry in &prompts {
            let source = match entry.source {
                PromptSource::Builtin => "built-in",
                PromptSource::Workspace => "workspace",
            };
            println!("{:<16} {}", entry.id, source);
        }

        Ok(())
    }
}
