//! Files command handler.
//!
//! Lists the documents attached to the configured vector store.

use super::print_json;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::IndexLister;
use docqa_llm::create_client;

/// List the files attached to the index
#[derive(Args, Debug)]
pub struct FilesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FilesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing files command");

        config.validate()?;
        let index_id = config.require_index_id()?;
        let client = create_client(config)?;

        let files = IndexLister::new(&*client).list_files(index_id).await?;

        if self.json {
            let entries: Vec<serde_json::Value> = files
                .iter()
                .map(|f| serde_json::json!({"fileId": f.file_id, "filename": f.filename}))
                .collect();
            return print_json(&serde_json::json!({
                "index": index_id,
                "count": files.len(),
                "files": entries,
            }));
        }

        if files.is_empty() {
            println!("No files are attached to {}", index_id);
            return Ok(());
        }

        for file in &files {
            println!("{}", file.filename);
        }
        eprintln!("{} files in {}", files.len(), index_id);

        Ok(())
    }
}
