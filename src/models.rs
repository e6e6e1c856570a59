//! Data models and structures
//!
//! Defines the analysis inputs and results, the provider-neutral request and
//! response shapes exchanged with the AI service, and runtime configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which caller-facing operation a request or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Analyze,
    GenerateMore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Analyze => write!(f, "analyze"),
            Operation::GenerateMore => write!(f, "generate_more"),
        }
    }
}

/// Instruction template selector. Supplemental runs carry the questions
/// already produced so the model can avoid repeating them.
#[derive(Debug, Clone, Copy)]
pub enum AnalysisMode<'a> {
    Initial,
    Supplemental { prior_questions: &'a [String] },
}

impl AnalysisMode<'_> {
    pub fn operation(&self) -> Operation {
        match self {
            AnalysisMode::Initial => Operation::Analyze,
            AnalysisMode::Supplemental { .. } => Operation::GenerateMore,
        }
    }
}

/// Base64 image payload tagged with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data: String,
}

/// Source material for one analysis: pasted text plus images in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInput {
    pub text: String,
    pub images: Vec<ImageAttachment>,
}

impl ContentInput {
    pub fn new(text: impl Into<String>, images: Vec<ImageAttachment>) -> Self {
        Self {
            text: text.into(),
            images,
        }
    }

    /// True when there is neither meaningful text nor any image.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }
}

/// One ordered element of an [`AnalysisRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    InlineData(ImageAttachment),
    /// The trailing instruction block. Always the last part.
    Instruction(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub operation: Operation,
    pub parts: Vec<RequestPart>,
    pub web_search: bool,
}

/// Web source attached to a grounding entry. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingEntry {
    pub web: Option<WebSource>,
}

/// What the upstream service handed back, independent of provider wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
    pub grounding: Vec<GroundingEntry>,
}

impl ModelResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebReference {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub questions: Vec<String>,
    pub references: Vec<WebReference>,
}

// Configuration
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| {
                Error::Config("GEMINI_API_KEY (or API_KEY) environment variable is not set".into())
            })?;

        let timeout = match non_empty("GEMINI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(Error::Config(format!(
                        "GEMINI_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
        })
    }
}
