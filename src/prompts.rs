pub const INITIAL_ANALYSIS: &str = include_str!("../data/prompts/initial_analysis.txt");
pub const SUPPLEMENTAL_QUESTIONS: &str =
    include_str!("../data/prompts/supplemental_questions.txt");

/// Marker line that opens the summary section of an analysis response.
pub const SUMMARY_MARKER: &str = "### SUMMARY ###";
/// Marker line that opens the questions section of an analysis response.
pub const QUESTIONS_MARKER: &str = "### QUESTIONS ###";

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

pub fn initial_instruction() -> String {
    render(
        INITIAL_ANALYSIS,
        &[
            ("summary_marker", SUMMARY_MARKER),
            ("questions_marker", QUESTIONS_MARKER),
        ],
    )
}

pub fn supplemental_instruction(prior_questions: &[String]) -> String {
    render(
        SUPPLEMENTAL_QUESTIONS,
        &[("existing_questions", &prior_questions.join("\n\n"))],
    )
}
