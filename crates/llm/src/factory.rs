//! Service client factory.
//!
//! Builds the HTTP client from the loaded application configuration.

use crate::providers::OpenAiClient;
use docqa_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create the remote service client.
///
/// # Errors
/// Returns `ConfigurationMissing` when no API key is configured, or a
/// configuration error when the HTTP client cannot be built.
pub fn create_client(config: &AppConfig) -> AppResult<Arc<OpenAiClient>> {
    let api_key = config.require_api_key()?;

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(AppError::Config(format!(
            "Unsupported base URL: {}",
            config.base_url
        )));
    }

    tracing::debug!("Creating OpenAI client for {}", config.base_url);

    let client = OpenAiClient::new(
        &config.base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ResponsesApi;

    #[test]
    fn test_create_client() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            ..AppConfig::default()
        };
        let client = create_client(&config).unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_requires_api_key() {
        let config = AppConfig {
            api_key: None,
            ..AppConfig::default()
        };
        assert!(matches!(
            create_client(&config),
            Err(AppError::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "ftp://example.com".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(create_client(&config), Err(AppError::Config(_))));
    }
}
