use super::{
    form::AnalysisForm,
    types::{AnalysisResponse, ApiError, HealthResponse},
};
use crate::{
    Error,
    analysis::PromptAssembler,
    config::Config,
    llm::{self, GenerativeModel},
};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Clone)]
pub struct AppState {
    /// `None` when the process started without a credential.
    pub model: Option<Arc<dyn GenerativeModel>>,
    pub assembler: PromptAssembler,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>, assembler: PromptAssembler) -> Self {
        Self { model, assembler }
    }

    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(Self::new(
            llm::from_config(&config.llm)?,
            PromptAssembler::new(config.features.audio),
        ))
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn analyze(
    State(state): State<AppState>,
    AnalysisForm(request): AnalysisForm,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let result = async {
        let model = state.model.as_ref().ok_or(Error::MissingCredential)?;

        // Image decoding is CPU-bound; keep it off the async workers.
        let assembler = state.assembler;
        let (request, payload) = tokio::task::spawn_blocking(move || {
            let payload = assembler.assemble_payload(&request);
            (request, payload)
        })
        .await?;
        let payload = payload?;

        info!(
            "Sending request to model... Location: {:?}, Image: {}, Audio: {}",
            request.location,
            payload.has_image(),
            payload.has_audio()
        );

        let response = model
            .generate(&payload)
            .await
            .map_err(|e| Error::model(e.to_string()))?;

        Ok::<_, Error>((response.text, request.location))
    }
    .await;

    match result {
        Ok((text, location)) => {
            info!("Model responded with {} bytes", text.len());
            Ok(Json(AnalysisResponse {
                response: text,
                location_context: location,
            }))
        }
        Err(e) => {
            if e.is_client_error() {
                info!("Rejected analyze request: {}", e);
            } else {
                error!("Error in analyze: {}", e);
            }
            Err(e.into())
        }
    }
}
