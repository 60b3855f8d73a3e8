//! Configuration management for the DocQA CLI.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.docqa/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The merged configuration is built once per invocation and then passed by
//! reference; nothing mutates it while a request is in flight.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Default OpenAI-compatible API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable holding the API key unless the config file names another.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the vector store (index) identifier.
pub const INDEX_ID_ENV: &str = "OPENAI_VECTOR_STORE_ID";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (may contain .docqa/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Name of the environment variable the API key is read from
    pub api_key_env: String,

    /// API key for the remote service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Vector store identifier the questions run against
    pub index_id: Option<String>,

    /// Model identifier
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,

    /// Run polling schedule for the job protocol
    pub polling: PollPolicy,

    /// Which protocols the dispatcher may use
    pub mode: DispatchMode,

    /// Delete ephemeral assistants and threads after each job run
    pub cleanup: bool,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Bounded exponential backoff used while polling a job run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// First sleep between status checks
    pub initial_interval_secs: f64,

    /// Growth factor applied after every poll
    pub multiplier: f64,

    /// Upper bound for a single sleep
    pub max_interval_secs: f64,

    /// Wall-clock budget for the whole polling loop
    pub deadline_secs: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval_secs: 0.75,
            multiplier: 1.5,
            max_interval_secs: 6.0,
            deadline_secs: 360,
        }
    }
}

impl PollPolicy {
    pub fn initial_interval(&self) -> Duration {
        secs_to_duration(self.initial_interval_secs.min(self.max_interval_secs))
    }

    /// Interval to use after sleeping `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let next = current.as_secs_f64() * self.multiplier;
        secs_to_duration(next.min(self.max_interval_secs))
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    fn validate(&self) -> AppResult<()> {
        if !(self.initial_interval_secs > 0.0) || !(self.max_interval_secs > 0.0) {
            return Err(AppError::Config(
                "Polling intervals must be positive".to_string(),
            ));
        }
        if !(self.multiplier >= 1.0) {
            return Err(AppError::Config(format!(
                "Polling multiplier must be >= 1.0, got {}",
                self.multiplier
            )));
        }
        if self.deadline_secs == 0 || self.deadline_secs > MAX_DEADLINE_SECS {
            return Err(AppError::Config(format!(
                "Polling deadline must be between 1 and {} seconds, got {}",
                MAX_DEADLINE_SECS, self.deadline_secs
            )));
        }
        if self.initial_interval_secs > self.max_interval_secs
            || self.max_interval_secs > self.deadline_secs as f64
        {
            return Err(AppError::Config(format!(
                "Polling intervals must satisfy initial ({}) <= max ({}) <= deadline ({})",
                self.initial_interval_secs, self.max_interval_secs, self.deadline_secs
            )));
        }
        Ok(())
    }
}

/// Longest accepted polling deadline (one day).
const MAX_DEADLINE_SECS: u64 = 86_400;

/// Out-of-range values saturate instead of panicking.
fn secs_to_duration(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => duration,
        Err(_) if secs > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

/// Protocols the query dispatcher is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Direct request shapes first, then the job protocol
    #[default]
    Auto,
    /// Direct request shapes only
    Direct,
    /// Job protocol only
    Job,
}

impl DispatchMode {
    /// Parse a mode from its string name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "direct" | "responses" => Some(Self::Direct),
            "job" | "assistants" => Some(Self::Job),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Direct => "direct",
            Self::Job => "job",
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    openai: Option<OpenAiSection>,
    polling: Option<PollingSection>,
    dispatch: Option<DispatchSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenAiSection {
    api_key_env: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    vector_store_id: Option<String>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollingSection {
    initial_interval_secs: Option<f64>,
    multiplier: Option<f64>,
    max_interval_secs: Option<f64>,
    deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DispatchSection {
    mode: Option<String>,
    cleanup: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            index_id: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 120,
            polling: PollPolicy::default(),
            mode: DispatchMode::Auto,
            cleanup: true,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and environment variables.
    ///
    /// Environment variables:
    /// - `DOCQA_WORKSPACE`: Override workspace path
    /// - `DOCQA_CONFIG`: Path to config file
    /// - `DOCQA_MODEL`: Model identifier
    /// - `DOCQA_BASE_URL`: API base URL
    /// - `OPENAI_API_KEY` (or the variable named by `openai.apiKeyEnv`): API key
    /// - `OPENAI_VECTOR_STORE_ID`: Vector store identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docqa_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Model: {}", config.model);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration with an explicit workspace and/or config file.
    ///
    /// Explicit arguments win over `DOCQA_WORKSPACE` / `DOCQA_CONFIG`.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| std::env::var("DOCQA_WORKSPACE").ok().map(PathBuf::from)) {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("DOCQA_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.docqa_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("DOCQA_MODEL") {
            config.model = model;
        }

        if let Ok(base_url) = std::env::var("DOCQA_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(index_id) = std::env::var(INDEX_ID_ENV) {
            config.index_id = Some(index_id);
        }

        config.api_key = std::env::var(&config.api_key_env).ok();

        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(mut self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;

        if let Some(openai) = config_file.openai {
            if let Some(api_key_env) = openai.api_key_env {
                self.api_key_env = api_key_env;
            }
            if let Some(base_url) = openai.base_url {
                self.base_url = base_url;
            }
            if let Some(model) = openai.model {
                self.model = model;
            }
            if openai.vector_store_id.is_some() {
                self.index_id = openai.vector_store_id;
            }
            if let Some(timeout) = openai.request_timeout_secs {
                self.request_timeout_secs = timeout;
            }
        }

        if let Some(polling) = config_file.polling {
            if let Some(v) = polling.initial_interval_secs {
                self.polling.initial_interval_secs = v;
            }
            if let Some(v) = polling.multiplier {
                self.polling.multiplier = v;
            }
            if let Some(v) = polling.max_interval_secs {
                self.polling.max_interval_secs = v;
            }
            if let Some(v) = polling.deadline_secs {
                self.polling.deadline_secs = v;
            }
        }

        if let Some(dispatch) = config_file.dispatch {
            if let Some(mode) = dispatch.mode {
                self.mode = DispatchMode::parse(&mode).ok_or_else(|| {
                    AppError::Config(format!(
                        "Unknown dispatch mode: {}. Supported: auto, direct, job",
                        mode
                    ))
                })?;
            }
            if let Some(cleanup) = dispatch.cleanup {
                self.cleanup = cleanup;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(self)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        index_id: Option<String>,
        base_url: Option<String>,
        mode: Option<DispatchMode>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(model) = model {
            self.model = model;
        }

        if let Some(index_id) = index_id {
            self.index_id = Some(index_id);
        }

        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }

        if let Some(mode) = mode {
            self.mode = mode;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .docqa directory.
    pub fn docqa_dir(&self) -> PathBuf {
        self.workspace.join(".docqa")
    }

    /// The configured API key, or `ConfigurationMissing`.
    pub fn require_api_key(&self) -> AppResult<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(AppError::ConfigurationMissing(format!(
                "API key not found; set {} in the environment",
                self.api_key_env
            ))),
        }
    }

    /// The configured index identifier, or `ConfigurationMissing`.
    pub fn require_index_id(&self) -> AppResult<&str> {
        match self.index_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(AppError::ConfigurationMissing(format!(
                "Vector store ID not found; set {} or pass --index",
                INDEX_ID_ENV
            ))),
        }
    }

    /// Validate everything a remote call needs, before any remote call is made.
    pub fn validate(&self) -> AppResult<()> {
        self.require_api_key()?;
        self.require_index_id()?;

        if self.model.trim().is_empty() {
            return Err(AppError::ConfigurationMissing(
                "Model identifier cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }

        self.polling.validate()
    }
}
