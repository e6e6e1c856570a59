//! Caller-facing analysis operations.
//!
//! [`Analyzer`] wires the request builder, an [`AnalysisService`] and the
//! response parser together. It never retries; every failure is terminal for
//! the call and is reported to the observer before being returned.

use crate::ai::{AnalysisService, GeminiAnalysisClient};
use crate::error::classify_empty_response;
use crate::models::{AnalysisMode, AnalysisResult, Config, ContentInput, GroundingEntry};
use crate::observer::{AnalysisObserver, TracingObserver};
use crate::parser::{self, SUMMARY_FALLBACK};
use crate::request::build_request;
use crate::Result;
use std::sync::Arc;

pub struct Analyzer {
    service: Box<dyn AnalysisService>,
    observer: Arc<dyn AnalysisObserver>,
}

impl Analyzer {
    /// Build an analyzer around any service, logging through `tracing`.
    pub fn new(service: Box<dyn AnalysisService>) -> Self {
        Self {
            service,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Build an analyzer backed by Gemini using validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Box::new(GeminiAnalysisClient::from_config(
            config,
            reqwest::Client::new(),
        )))
    }

    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Produce a summary, a first batch of questions and web references.
    ///
    /// The caller is expected to reject empty input beforehand.
    pub async fn analyze(&self, input: &ContentInput) -> Result<AnalysisResult> {
        let mode = AnalysisMode::Initial;
        let (text, grounding) = self.request_text(mode, input).await?;

        let parsed = parser::parse_analysis(&text);
        if parsed.questions.is_empty() || parsed.summary == SUMMARY_FALLBACK {
            self.observer.on_degraded(mode.operation());
        }
        self.observer
            .on_success(mode.operation(), parsed.questions.len());

        Ok(AnalysisResult {
            summary: parsed.summary,
            questions: parsed.questions,
            references: parser::extract_references(&grounding),
        })
    }

    /// Ask for a batch of new questions that avoid `existing_questions`.
    pub async fn generate_more(
        &self,
        input: &ContentInput,
        existing_questions: &[String],
    ) -> Result<Vec<String>> {
        let mode = AnalysisMode::Supplemental {
            prior_questions: existing_questions,
        };
        let (text, _) = self.request_text(mode, input).await?;

        let questions = parser::parse_question_list(&text);
        if questions.is_empty() {
            self.observer.on_degraded(mode.operation());
        }
        self.observer.on_success(mode.operation(), questions.len());

        Ok(questions)
    }

    async fn request_text(
        &self,
        mode: AnalysisMode<'_>,
        input: &ContentInput,
    ) -> Result<(String, Vec<GroundingEntry>)> {
        let operation = mode.operation();
        let request = build_request(mode, input);
        self.observer.on_request(operation, request.parts.len());

        let response = match self.service.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.observer.on_failure(operation, &e);
                return Err(e);
            }
        };

        match response.text {
            Some(text) => Ok((text, response.grounding)),
            None => {
                let e = classify_empty_response(operation, response.finish_reason.as_deref());
                self.observer.on_failure(operation, &e);
                Err(e)
            }
        }
    }
}
