use once_cell::sync::Lazy;

use crate::{
    constants::prompts::{ANSWER_GRADER_PROMPT, DISCHARGE_EXPLAINER_PROMPT, DISCHARGE_OUTPUT_CUE},
    models::domain::StructuredSummary,
};

static SUMMARY_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(StructuredSummary);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|err| {
        log::error!("Failed to serialize summary schema: {}", err);
        String::new()
    })
});

/// Builds the single prompt sent for a discharge summary. The text is passed
/// through as-is: no trimming, truncation, or chunking.
pub fn build_explanation_prompt(discharge_text: &str) -> String {
    format!(
        "{instructions}\n\n## JSON SCHEMA\n\n{schema}\n\n## DISCHARGE SUMMARY\n\n{text}\n\n{cue}",
        instructions = DISCHARGE_EXPLAINER_PROMPT,
        schema = SUMMARY_SCHEMA.as_str(),
        text = discharge_text,
        cue = DISCHARGE_OUTPUT_CUE,
    )
}

pub fn build_grading_prompt(question: &str, reference_answer: &str, user_answer: &str) -> String {
    format!(
        "{instructions}\n\nQuestion: {question}\nReference answer: {reference_answer}\nParent's answer: {user_answer}\n\nJSON:",
        instructions = ANSWER_GRADER_PROMPT,
    )
}
