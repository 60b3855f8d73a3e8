//! DocQA CLI
//!
//! Main entry point for the docqa command-line tool.
//! Asks cited questions against a remote vector store of PDF documents.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, FilesCommand, PromptsCommand, SummarizeCommand};
use docqa_core::{
    config::AppConfig,
    logging::{self, LogFormat},
    AppResult,
};
use std::path::PathBuf;

/// DocQA - cited answers from documents in a remote vector store
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Cited answers from documents in a remote vector store", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "DOCQA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DOCQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Model identifier
    #[arg(short, long, global = true, env = "DOCQA_MODEL")]
    model: Option<String>,

    /// Vector store identifier
    #[arg(short, long, global = true, env = "OPENAI_VECTOR_STORE_ID")]
    index: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, env = "DOCQA_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question against the indexed documents
    Ask(AskCommand),

    /// List the files attached to the index
    Files(FilesCommand),

    /// Summarize every file in the index
    Summarize(SummarizeCommand),

    /// List available prompts
    Prompts(PromptsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load_from(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.model,
        cli.index,
        cli.base_url,
        None,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    let format = std::env::var("DOCQA_LOG_FORMAT")
        .ok()
        .and_then(|f| LogFormat::parse(&f))
        .unwrap_or_default();
    logging::init_logging(config.log_level.as_deref(), config.no_color, format)?;

    tracing::info!("DocQA CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Base URL: {}", config.base_url);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Files(_) => "files",
        Commands::Summarize(_) => "summarize",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Files(cmd) => cmd.execute(&config).await,
        Commands::Summarize(cmd) => cmd.execute(&config).await,
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!(kind = e.kind(), "Command failed: {}", e),
    }

    result
}
