use super::AnalysisService;
use crate::models::{AnalysisRequest, ModelResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted [`AnalysisService`] for tests and offline harnesses.
///
/// Responses are replayed in order, cycling once exhausted. Every request
/// is recorded so callers can assert on what would have been sent.
#[derive(Clone)]
pub struct MockAnalysisClient {
    responses: Arc<Mutex<Vec<std::result::Result<ModelResponse, String>>>>,
    requests: Arc<Mutex<Vec<AnalysisRequest>>>,
}

impl MockAnalysisClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(ModelResponse::with_text(text))
    }

    pub fn with_response(self, response: ModelResponse) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    /// Queue a provider failure, surfaced as [`Error::AiProvider`].
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisClient {
    async fn generate(&self, request: &AnalysisRequest) -> Result<ModelResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            return Ok(ModelResponse::with_text(
                "### SUMMARY ###\nMock summary\n### QUESTIONS ###\n1. Mock question?",
            ));
        }

        match &responses[(call - 1) % responses.len()] {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}
