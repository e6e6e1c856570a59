//! Gemini implementation of [`AnalysisService`].

use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GoogleSearch, InlineData, Part, Tool,
};
use crate::ai::AnalysisService;
use crate::models::{
    AnalysisRequest, Config, GroundingEntry, ModelResponse, RequestPart, WebSource,
    DEFAULT_TIMEOUT,
};
use crate::Result;
use async_trait::async_trait;

pub struct GeminiAnalysisClient {
    http: GeminiHttpClient,
}

impl GeminiAnalysisClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, DEFAULT_TIMEOUT, client),
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::from_config(config, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn to_wire(request: &AnalysisRequest) -> GenerateContentRequest {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) | RequestPart::Instruction(text) => {
                    Part::Text { text: text.clone() }
                }
                RequestPart::InlineData(image) => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            })
            .collect();

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            tools: request.web_search.then(|| {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            }),
        }
    }

    fn from_wire(response: GenerateContentResponse) -> ModelResponse {
        let Some(candidate) = response.candidates.into_iter().next() else {
            // A blocked prompt comes back without candidates.
            return ModelResponse {
                finish_reason: response.prompt_feedback.and_then(|f| f.block_reason),
                ..ModelResponse::default()
            };
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let grounding = candidate
            .grounding_metadata
            .unwrap_or_default()
            .grounding_chunks
            .into_iter()
            .map(|chunk| GroundingEntry {
                web: chunk.web.map(|web| WebSource {
                    uri: web.uri,
                    title: web.title,
                }),
            })
            .collect();

        ModelResponse {
            text: (!text.is_empty()).then_some(text),
            finish_reason: candidate.finish_reason,
            grounding,
        }
    }
}

#[async_trait]
impl AnalysisService for GeminiAnalysisClient {
    async fn generate(&self, request: &AnalysisRequest) -> Result<ModelResponse> {
        tracing::debug!(
            "Sending {} request to Gemini model {} ({} parts, web_search={})",
            request.operation,
            self.http.model(),
            request.parts.len(),
            request.web_search
        );

        let wire = Self::to_wire(request);
        let response: GenerateContentResponse = self.http.generate_content(&wire).await?;
        Ok(Self::from_wire(response))
    }
}
