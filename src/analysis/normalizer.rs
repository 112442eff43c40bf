use super::{
    prompt::build_prompt,
    types::{AnalysisRequest, DecodedImage},
};
use crate::{
    error::InputError,
    llm::{PromptPart, PromptPayload},
};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use tracing::{debug, warn};

/// Turns an [`AnalysisRequest`] into an ordered [`PromptPayload`].
#[derive(Debug, Clone, Copy)]
pub struct PromptAssembler {
    audio_enabled: bool,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PromptAssembler {
    pub fn new(audio_enabled: bool) -> Self {
        Self { audio_enabled }
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn validate(&self, request: &AnalysisRequest) -> Result<(), InputError> {
        let has_audio = self.audio_enabled && request.has_audio();
        if request.has_text() || request.has_image() || has_audio {
            Ok(())
        } else {
            Err(InputError::MissingInput {
                audio_enabled: self.audio_enabled,
            })
        }
    }

    /// Validate, format the context block, then attach image and audio.
    pub fn assemble_payload(&self, request: &AnalysisRequest) -> Result<PromptPayload, InputError> {
        self.validate(request)?;

        let mut parts = vec![PromptPart::Text(build_prompt(
            request.location.as_deref(),
            &request.language_code,
            request.text.as_deref(),
        ))];

        if let Some(bytes) = request.image_bytes.as_deref().filter(|b| !b.is_empty()) {
            let image = decode_image(bytes)?;
            if let Some(declared) = request.image_mime_type.as_deref() {
                if declared != image.mime_type {
                    debug!(
                        "Declared image type {} differs from detected {}",
                        declared, image.mime_type
                    );
                }
            }
            parts.push(image.into());
        }

        if let Some(bytes) = request.audio_bytes.as_deref().filter(|b| !b.is_empty()) {
            if self.audio_enabled {
                parts.push(PromptPart::Audio {
                    data: bytes.to_vec(),
                    mime_type: request.audio_mime_type().to_string(),
                });
            } else {
                debug!("Audio support disabled, ignoring {} byte upload", bytes.len());
            }
        }

        Ok(PromptPayload::new(parts))
    }
}

/// Checks that `bytes` hold a raster image in a supported format.
///
/// PNG, JPEG and WebP pass through untouched. Anything else the decoder
/// accepts (BMP, TIFF, GIF, ...) is re-encoded as PNG so the model only
/// ever sees types it accepts. Decoder allocation limits are lifted; upload
/// size is bounded by the HTTP layer.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, InputError> {
    let invalid = |reason: String| {
        warn!("Image processing failed: {}", reason);
        InputError::InvalidImage { reason }
    };

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| invalid(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| invalid("unrecognized image format".to_string()))?;
    reader.no_limits();

    let image = reader.decode().map_err(|e| invalid(e.to_string()))?;
    let (width, height) = (image.width(), image.height());

    if matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP
    ) {
        return Ok(DecodedImage {
            data: bytes.to_vec(),
            mime_type: format.to_mime_type().to_string(),
            width,
            height,
        });
    }

    debug!("Re-encoding {:?} upload as PNG", format);
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image.to_rgba8())
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| invalid(e.to_string()))?;

    Ok(DecodedImage {
        data: out.into_inner(),
        mime_type: ImageFormat::Png.to_mime_type().to_string(),
        width,
        height,
    })
}
