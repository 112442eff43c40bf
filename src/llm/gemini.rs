use super::{client::GenerativeModel, types::*};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini REST client speaking `generateContent` and `models.list`.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    response_mime_type: Option<String>,
}

impl GeminiClient {
    /// `model` may be given with or without the `models/` prefix.
    pub fn new(api_key: impl Into<String>, model: &str, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: impl Into<String>,
        model: &str,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.strip_prefix("models/").unwrap_or(model).to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            response_mime_type: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Asks the model to answer with `application/json`.
    pub fn with_json_output(mut self) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Lists every model the credential can see, following pagination.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListModelsResponse = Self::read_json(request.send().await?).await?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Gemini reported {} models", models.len());
        Ok(models)
    }

    async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: String,
        request: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        Self::read_json(response).await
    }

    async fn read_json<Resp: DeserializeOwned>(response: reqwest::Response) -> Result<Resp> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Gemini API error (status {}): {}", status, body);
            return Err(Error::model(format!(
                "Gemini API error (status {}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            Error::model(format!("Failed to parse Gemini response: {}", e))
        })
    }

    fn to_request(&self, payload: &PromptPayload) -> GenerateContentRequest {
        let engine = base64::engine::general_purpose::STANDARD;
        let parts = payload
            .parts()
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => GeminiPart::Text { text: text.clone() },
                PromptPart::Image { data, mime_type } | PromptPart::Audio { data, mime_type } => {
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.clone(),
                            data: engine.encode(data),
                        },
                    }
                }
            })
            .collect();

        GenerateContentRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: self
                .response_mime_type
                .as_ref()
                .map(|mime| GenerationConfig {
                    response_mime_type: Some(mime.clone()),
                }),
        }
    }

    /// Concatenates the text parts of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Result<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!(" (prompt blocked: {})", r))
                .unwrap_or_default();
            return Err(Error::model(format!(
                "Gemini returned no candidates{}",
                reason
            )));
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| match part {
                        GeminiPart::Text { text } => Some(text),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::model(format!(
                "Gemini response contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, payload: &PromptPayload) -> Result<ModelResponse> {
        debug!(
            "Calling Gemini model {} with {} parts",
            self.model,
            payload.len()
        );

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response: GenerateContentResponse =
            self.post_json(url, &self.to_request(payload)).await?;

        Ok(ModelResponse {
            text: Self::extract_text(response)?,
        })
    }
}
