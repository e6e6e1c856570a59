//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use crate::models::Operation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure: connect errors, timeouts, broken bodies.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but not with something usable (non-2xx, bad JSON).
    #[error("AI provider error: {0}")]
    AiProvider(String),

    /// The provider completed the call without any text payload.
    #[error("{}", empty_response_message(.operation, .reason))]
    EmptyResponse {
        operation: Operation,
        reason: EmptyResponseReason,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Please provide some text or at least one image to analyze.")]
    EmptyInput,

    #[error("No analysis result to extend; run an analysis first")]
    NoActiveAnalysis,

    #[error("Attachment error: {0}")]
    Attachment(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why the provider returned no text, derived from the candidate's finish reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyResponseReason {
    Safety,
    Stopped(String),
    Unspecified,
}

/// Map an empty upstream answer to a terminal error for `operation`.
pub fn classify_empty_response(operation: Operation, finish_reason: Option<&str>) -> Error {
    let reason = match finish_reason {
        Some("SAFETY") => EmptyResponseReason::Safety,
        Some(other) if !other.is_empty() => EmptyResponseReason::Stopped(other.to_string()),
        _ => EmptyResponseReason::Unspecified,
    };
    Error::EmptyResponse { operation, reason }
}

fn empty_response_message(operation: &Operation, reason: &EmptyResponseReason) -> String {
    match (operation, reason) {
        (Operation::Analyze, EmptyResponseReason::Safety) => {
            "The request was blocked due to safety settings. \
             Please check the content for any sensitive material."
                .to_string()
        }
        (Operation::Analyze, EmptyResponseReason::Stopped(r)) => {
            format!("Analysis stopped unexpectedly. Reason: {}.", r)
        }
        (Operation::Analyze, EmptyResponseReason::Unspecified) => {
            "AI service returned an empty response.".to_string()
        }
        (Operation::GenerateMore, EmptyResponseReason::Safety) => {
            "The request for more questions was blocked due to safety settings.".to_string()
        }
        (Operation::GenerateMore, EmptyResponseReason::Stopped(r)) => {
            format!("Generation stopped unexpectedly. Reason: {}.", r)
        }
        (Operation::GenerateMore, EmptyResponseReason::Unspecified) => {
            "AI service returned an empty response while generating more questions.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_safety() {
        let err = classify_empty_response(Operation::Analyze, Some("SAFETY"));
        assert!(matches!(
            err,
            Error::EmptyResponse {
                reason: EmptyResponseReason::Safety,
                ..
            }
        ));
        assert!(err.to_string().contains("blocked due to safety settings"));
    }

    #[test]
    fn test_classify_other_reason_is_surfaced_verbatim() {
        let err = classify_empty_response(Operation::GenerateMore, Some("MAX_TOKENS"));
        assert_eq!(
            err.to_string(),
            "Generation stopped unexpectedly. Reason: MAX_TOKENS."
        );
    }

    #[test]
    fn test_classify_analyze_stop_reason_message() {
        let err = classify_empty_response(Operation::Analyze, Some("MAX_TOKENS"));
        assert_eq!(
            err.to_string(),
            "Analysis stopped unexpectedly. Reason: MAX_TOKENS."
        );
    }

    #[test]
    fn test_classify_missing_reason() {
        let err = classify_empty_response(Operation::Analyze, None);
        assert_eq!(err.to_string(), "AI service returned an empty response.");

        let err = classify_empty_response(Operation::GenerateMore, Some(""));
        assert_eq!(
            err.to_string(),
            "AI service returned an empty response while generating more questions."
        );
    }

    #[test]
    fn test_messages_differ_by_operation() {
        let analyze = classify_empty_response(Operation::Analyze, Some("SAFETY")).to_string();
        let more = classify_empty_response(Operation::GenerateMore, Some("SAFETY")).to_string();
        assert_ne!(analyze, more);
    }
}
