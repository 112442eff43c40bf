use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use base64::Engine as _;
use std::time::Duration;
use tracing::debug;

/// The generative-model collaborator. Implementations must not retry.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, payload: &PromptPayload) -> Result<ModelResponse>;
}

/// Talks to any OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url.clone());
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // A zero elapsed-time budget makes every failure permanent: no retries.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(no_retry);

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    fn to_content_part(
        part: &PromptPart,
    ) -> Result<openai_types::ChatCompletionRequestUserMessageContentPart> {
        let engine = base64::engine::general_purpose::STANDARD;
        let converted = match part {
            PromptPart::Text(text) => {
                openai_types::ChatCompletionRequestUserMessageContentPart::Text(
                    openai_types::ChatCompletionRequestMessageContentPartText { text: text.clone() },
                )
            }
            PromptPart::Image { data, mime_type } => {
                openai_types::ChatCompletionRequestUserMessageContentPart::ImageUrl(
                    openai_types::ChatCompletionRequestMessageContentPartImage {
                        image_url: openai_types::ImageUrl {
                            url: format!("data:{};base64,{}", mime_type, engine.encode(data)),
                            detail: None,
                        },
                    },
                )
            }
            PromptPart::Audio { data, mime_type } => {
                openai_types::ChatCompletionRequestUserMessageContentPart::InputAudio(
                    openai_types::ChatCompletionRequestMessageContentPartAudio {
                        input_audio: openai_types::InputAudio {
                            data: engine.encode(data),
                            format: audio_format(mime_type)?,
                        },
                    },
                )
            }
        };
        Ok(converted)
    }
}

/// The chat completions protocol only carries wav and mp3 audio.
fn audio_format(mime_type: &str) -> Result<openai_types::InputAudioFormat> {
    match mime_type {
        "audio/wav" | "audio/x-wav" | "audio/wave" => Ok(openai_types::InputAudioFormat::Wav),
        "audio/mpeg" | "audio/mp3" => Ok(openai_types::InputAudioFormat::Mp3),
        other => Err(Error::model(format!(
            "Audio type '{}' is not supported by the OpenAI-compatible provider",
            other
        ))),
    }
}

#[async_trait]
impl GenerativeModel for OpenAiClient {
    async fn generate(&self, payload: &PromptPayload) -> Result<ModelResponse> {
        debug!(
            "Creating chat completion with {} content parts",
            payload.len()
        );

        let parts = payload
            .parts()
            .iter()
            .map(Self::to_content_part)
            .collect::<Result<Vec<_>>>()?;

        let message: openai_types::ChatCompletionRequestMessage =
            openai_types::ChatCompletionRequestUserMessageArgs::default()
                .content(openai_types::ChatCompletionRequestUserMessageContent::Array(
                    parts,
                ))
                .build()
                .map_err(|e| Error::model(format!("Failed to build user message: {}", e)))?
                .into();

        let request = openai_types::CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .build()?;

        let response = self.client.chat().create(request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| ModelResponse { text })
            .ok_or_else(|| Error::model("Model returned no text content"))
    }
}
