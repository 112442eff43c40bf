use super::prompt::DEFAULT_LANGUAGE_CODE;
use crate::llm::PromptPart;

pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/mp4";

/// Everything `/analyze` received, already pulled out of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: Option<String>,
    pub image_bytes: Option<Vec<u8>>,
    pub image_mime_type: Option<String>,
    pub audio_bytes: Option<Vec<u8>>,
    pub audio_mime_type: Option<String>,
    pub location: Option<String>,
    pub language_code: String,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            text: None,
            image_bytes: None,
            image_mime_type: None,
            audio_bytes: None,
            audio_mime_type: None,
            location: None,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }
}

impl AnalysisRequest {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_image(&self) -> bool {
        self.image_bytes.as_deref().is_some_and(|b| !b.is_empty())
    }

    pub fn has_audio(&self) -> bool {
        self.audio_bytes.as_deref().is_some_and(|b| !b.is_empty())
    }

    pub fn audio_mime_type(&self) -> &str {
        self.audio_mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_AUDIO_MIME_TYPE)
    }
}

/// An image whose bytes were verified to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl From<DecodedImage> for PromptPart {
    fn from(image: DecodedImage) -> Self {
        PromptPart::Image {
            data: image.data,
            mime_type: image.mime_type,
        }
    }
}
