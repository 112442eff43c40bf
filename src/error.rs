use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Problems with what the caller sent. Surfaced as `4xx` responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{}", missing_input_message(*audio_enabled))]
    MissingInput { audio_enabled: bool },

    #[error("Invalid image file.")]
    InvalidImage { reason: String },

    #[error("Malformed form data: {0}")]
    MalformedForm(String),

    #[error("Upload too large: {0}")]
    TooLarge(String),
}

fn missing_input_message(audio_enabled: bool) -> &'static str {
    if audio_enabled {
        "Either text, image, or audio must be provided."
    } else {
        "Either text or image must be provided."
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Server misconfiguration: API Key missing.")]
    MissingCredential,

    #[error("{0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Client input problems map to 4xx, everything else is the server's fault.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Input(InputError::TooLarge(_)) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Input(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}
