use super::types::ApiError;
use crate::{analysis::AnalysisRequest, error::InputError};
use axum::{
    async_trait,
    extract::{Form, FromRequest, Multipart, Request, multipart::Field},
    http::{StatusCode, header::CONTENT_TYPE},
};
use std::collections::HashMap;
use tracing::debug;

/// `/analyze` form fields, accepted as multipart or urlencoded.
///
/// A request without a body or content type yields an empty form, which the
/// assembler then rejects as missing input.
#[derive(Debug)]
pub struct AnalysisForm(pub AnalysisRequest);

#[async_trait]
impl<S> FromRequest<S> for AnalysisForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;
            return Ok(Self(read_multipart(multipart).await?));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;
            return Ok(Self(from_fields(fields)));
        }

        if content_type.is_empty() {
            return Ok(Self(AnalysisRequest::default()));
        }

        Err(InputError::MalformedForm(format!("unsupported content type '{}'", content_type)).into())
    }
}

fn form_error(status: StatusCode, message: String) -> InputError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        InputError::TooLarge(message)
    } else {
        InputError::MalformedForm(message)
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<AnalysisRequest, InputError> {
    let mut request = AnalysisRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => request.text = Some(field_text(field).await?),
            "location" => request.location = Some(field_text(field).await?),
            "language_code" => request.language_code = field_text(field).await?,
            "image" => {
                request.image_mime_type = field.content_type().map(str::to_string);
                request.image_bytes = Some(field_bytes(field).await?);
            }
            "audio" => {
                request.audio_mime_type = field.content_type().map(str::to_string);
                request.audio_bytes = Some(field_bytes(field).await?);
            }
            other => {
                debug!("Ignoring unexpected form field '{}'", other);
                field_bytes(field).await?;
            }
        }
    }

    Ok(request)
}

async fn field_text(field: Field<'_>) -> Result<String, InputError> {
    field
        .text()
        .await
        .map_err(|e| form_error(e.status(), e.body_text()))
}

async fn field_bytes(field: Field<'_>) -> Result<Vec<u8>, InputError> {
    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| form_error(e.status(), e.body_text()))
}

fn from_fields(mut fields: HashMap<String, String>) -> AnalysisRequest {
    let mut request = AnalysisRequest {
        text: fields.remove("text"),
        location: fields.remove("location"),
        ..AnalysisRequest::default()
    };
    if let Some(language_code) = fields.remove("language_code") {
        request.language_code = language_code;
    }
    request
}
