//! AI service integration for study analysis
//!
//! Provides the provider seam used by the analyzer, a Gemini implementation,
//! and a scripted mock for tests and local harnesses.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiAnalysisClient;
pub use mock::MockAnalysisClient;

use crate::models::{AnalysisRequest, ModelResponse};
use crate::Result;
use async_trait::async_trait;

/// Sends one built request upstream and returns the raw answer.
///
/// Implementations must not retry and must not interpret the text; empty
/// answers are classified by the caller.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn generate(&self, request: &AnalysisRequest) -> Result<ModelResponse>;
}
