pub mod client;
pub mod gemini;
pub mod types;

pub use client::*;
pub use gemini::GeminiClient;
pub use types::*;

use crate::{
    Result,
    config::{LlmConfig, Provider},
};
use std::{sync::Arc, time::Duration};

/// Builds the configured model handle, or `None` when no credential is set.
pub fn from_config(config: &LlmConfig) -> Result<Option<Arc<dyn GenerativeModel>>> {
    let Some(api_key) = config.credential() else {
        return Ok(None);
    };

    let model: Arc<dyn GenerativeModel> = match config.provider {
        Provider::Gemini => {
            let client = GeminiClient::new(
                api_key,
                &config.model,
                Duration::from_secs(config.timeout_secs),
            );
            if config.base_url.is_empty() {
                Arc::new(client)
            } else {
                Arc::new(client.with_base_url(config.base_url.as_str()))
            }
        }
        Provider::OpenAi => Arc::new(OpenAiClient::new(config, api_key)?),
    };

    Ok(Some(model))
}
