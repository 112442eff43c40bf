use super::mocks::MockModel;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use image::{ImageFormat, Rgb, RgbImage};
use localmind::{
    analysis::PromptAssembler,
    llm::GenerativeModel,
    server::{self, AppState},
};
use serde_json::Value;
use std::{io::Cursor, sync::Arc};

pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

/// App backed by `model`; audio support on.
pub fn create_test_app(model: MockModel) -> Router {
    create_app_with(Some(Arc::new(model)), true)
}

/// App started without a credential.
pub fn create_unconfigured_app() -> Router {
    create_app_with(None, true)
}

pub fn create_app_with(model: Option<Arc<dyn GenerativeModel>>, audio_enabled: bool) -> Router {
    let state = AppState::new(model, PromptAssembler::new(audio_enabled));
    server::router(state, TEST_UPLOAD_LIMIT)
}

/// A tiny valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(2, 2, Rgb([0, 128, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Hand-rolled `multipart/form-data` body for requests.
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: "localmind-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: Option<&str>, data: &[u8]) -> Self {
        let mut header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            self.boundary, name, filename
        );
        if let Some(content_type) = content_type {
            header.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        header.push_str("\r\n");

        self.body.extend_from_slice(header.as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
