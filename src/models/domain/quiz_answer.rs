use serde::{Deserialize, Serialize};

/// Which grader produced a `QuizAnswer`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "camelCase")]
pub enum GradedBy {
    Selection,
    Model,
    KeywordFallback,
}

/// Result of answering one quiz question. Lives only for the browser session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_indexes: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text_answer: Option<String>,
    pub is_correct: bool,
    pub feedback: String,
    pub graded_by: GradedBy,
}

/// Weighted score over a set of answered questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    /// Earned weight as a percentage of total weight, 0 to 100.
    pub percentage: f64,
    pub earned_weight: u32,
    pub total_weight: u32,
    pub correct_count: usize,
    pub question_count: usize,
    pub all_red_flags_correct: bool,
}
