use serde::{Deserialize, Serialize};

/// One element of a multimodal model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Image { data: Vec<u8>, mime_type: String },
    Audio { data: Vec<u8>, mime_type: String },
}

impl PromptPart {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image { .. } => "image",
            Self::Audio { .. } => "audio",
        }
    }
}

/// Ordered model input: the text block first, then image, then audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    parts: Vec<PromptPart>,
}

impl PromptPayload {
    pub fn new(parts: Vec<PromptPart>) -> Self {
        Self { parts }
    }

    pub fn text(prompt: impl Into<String>) -> Self {
        Self::new(vec![PromptPart::Text(prompt.into())])
    }

    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, PromptPart::Image { .. }))
    }

    pub fn has_audio(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, PromptPart::Audio { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
}

/// Model listing entry, as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

// Gemini `generateContent` wire format.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_payload_accessors() {
        let payload = PromptPayload::new(vec![
            PromptPart::Text("hi".to_string()),
            PromptPart::Audio {
                data: vec![1, 2, 3],
                mime_type: "audio/mp4".to_string(),
            },
        ]);

        assert_eq!(payload.len(), 2);
        assert!(!payload.has_image());
        assert!(payload.has_audio());
        assert_eq!(payload.parts()[0].kind(), "text");
        assert_eq!(payload.parts()[1].kind(), "audio");
    }

    #[test]
    fn test_gemini_parts_serialization() {
        let content = GeminiContent {
            role: Some("user".to_string()),
            parts: vec![
                GeminiPart::Text {
                    text: "hello".to_string(),
                },
                GeminiPart::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/png".to_string(),
                        data: "AAAA".to_string(),
                    },
                },
            ],
        };

        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "parts": [
                    { "text": "hello" },
                    { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
                ]
            })
        );
    }

    #[test]
    fn test_response_tolerates_unknown_parts_and_missing_content() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "finishReason": "SAFETY" },
                { "content": { "parts": [ { "functionCall": { "name": "f" } }, { "text": "ok" } ] } }
            ]
        }))
        .unwrap();

        assert_eq!(response.candidates.len(), 2);
        assert!(response.candidates[0].content.is_none());
        let parts = &response.candidates[1].content.as_ref().unwrap().parts;
        assert!(matches!(parts[0], GeminiPart::Other(_)));
        assert!(matches!(parts[1], GeminiPart::Text { .. }));
    }

    #[test]
    fn test_model_info_generate_content_support() {
        let info: ModelInfo = serde_json::from_value(json!({
            "name": "models/gemini-2.0-flash",
            "displayName": "Gemini 2.0 Flash",
            "supportedGenerationMethods": ["generateContent", "countTokens"]
        }))
        .unwrap();

        assert!(info.supports_generate_content());
        assert_eq!(info.display_name.as_deref(), Some("Gemini 2.0 Flash"));
    }
}
