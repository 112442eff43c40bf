use async_trait::async_trait;
use localmind::{
    Error, Result,
    llm::{GenerativeModel, ModelResponse, PromptPayload},
};
use std::sync::{Arc, Mutex};

/// Mock generative model for testing
#[derive(Debug, Clone)]
pub struct MockModel {
    pub payloads: Arc<Mutex<Vec<PromptPayload>>>,
    pub reply: String,
    pub error: Option<String>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
            reply: "mock reply".to_string(),
            error: None,
        }
    }

    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn get_payloads(&self) -> Vec<PromptPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, payload: &PromptPayload) -> Result<ModelResponse> {
        self.payloads.lock().unwrap().push(payload.clone());

        if let Some(ref error) = self.error {
            return Err(Error::model(error.clone()));
        }

        Ok(ModelResponse {
            text: self.reply.clone(),
        })
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}
