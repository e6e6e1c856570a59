//! Builds the ordered part list sent to the AI service.
//!
//! Source text comes first, then images in upload order, then exactly one
//! instruction block, so the model reads everything before it as material
//! rather than as instructions.

use crate::models::{AnalysisMode, AnalysisRequest, ContentInput, RequestPart};
use crate::prompts;

pub fn build_request(mode: AnalysisMode<'_>, input: &ContentInput) -> AnalysisRequest {
    let mut parts = Vec::with_capacity(input.images.len() + 2);

    if !input.text.is_empty() {
        parts.push(RequestPart::Text(input.text.clone()));
    }

    parts.extend(input.images.iter().cloned().map(RequestPart::InlineData));

    let (instruction, web_search) = match mode {
        AnalysisMode::Initial => (prompts::initial_instruction(), true),
        AnalysisMode::Supplemental { prior_questions } => {
            (prompts::supplemental_instruction(prior_questions), false)
        }
    };
    parts.push(RequestPart::Instruction(instruction));

    AnalysisRequest {
        operation: mode.operation(),
        parts,
        web_search,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageAttachment, Operation};
    use pretty_assertions::assert_eq;

    fn image(tag: &str) -> ImageAttachment {
        ImageAttachment {
            mime_type: "image/png".to_string(),
            data: tag.to_string(),
        }
    }

    #[test]
    fn test_parts_are_text_then_images_then_instruction() {
        let input = ContentInput::new("Hydraulic pumps", vec![image("i1"), image("i2")]);
        let request = build_request(AnalysisMode::Initial, &input);

        assert_eq!(request.parts.len(), 4);
        assert_eq!(
            request.parts[..3].to_vec(),
            vec![
                RequestPart::Text("Hydraulic pumps".to_string()),
                RequestPart::InlineData(image("i1")),
                RequestPart::InlineData(image("i2")),
            ]
        );
        assert!(matches!(request.parts[3], RequestPart::Instruction(_)));
        assert_eq!(request.operation, Operation::Analyze);
        assert!(request.web_search);
    }

    #[test]
    fn test_empty_text_emits_no_text_part() {
        let input = ContentInput::new("", vec![image("only")]);
        let request = build_request(AnalysisMode::Initial, &input);

        assert_eq!(request.parts.len(), 2);
        assert_eq!(request.parts[0], RequestPart::InlineData(image("only")));
        assert!(matches!(request.parts[1], RequestPart::Instruction(_)));
    }

    #[test]
    fn test_whitespace_text_is_still_sent() {
        let input = ContentInput::new(" ", vec![image("i")]);
        let request = build_request(AnalysisMode::Initial, &input);
        assert_eq!(request.parts[0], RequestPart::Text(" ".to_string()));
    }

    #[test]
    fn test_empty_image_data_passes_through() {
        let input = ContentInput::new("t", vec![image("")]);
        let request = build_request(AnalysisMode::Initial, &input);
        assert_eq!(request.parts[1], RequestPart::InlineData(image("")));
    }

    #[test]
    fn test_supplemental_mode() {
        let prior = vec!["1. Old?".to_string(), "2. Older?".to_string()];
        let input = ContentInput::new("Notes", vec![]);
        let request = build_request(
            AnalysisMode::Supplemental {
                prior_questions: &prior,
            },
            &input,
        );

        assert_eq!(request.operation, Operation::GenerateMore);
        assert!(!request.web_search);
        match request.parts.last() {
            Some(RequestPart::Instruction(text)) => {
                assert!(text.contains("1. Old?\n\n2. Older?"));
                assert!(!text.contains(prompts::QUESTIONS_MARKER));
            }
            other => panic!("expected trailing instruction, got {:?}", other),
        }
    }

    #[test]
    fn test_supplemental_with_no_prior_questions() {
        let input = ContentInput::new("Notes", vec![]);
        let request = build_request(
            AnalysisMode::Supplemental {
                prior_questions: &[],
            },
            &input,
        );
        assert_eq!(request.parts.len(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = ContentInput::new("same", vec![image("a")]);
        let first = build_request(AnalysisMode::Initial, &input);
        let second = build_request(AnalysisMode::Initial, &input);
        assert_eq!(first, second);
    }
}
