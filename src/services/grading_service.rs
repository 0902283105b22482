use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{GradedBy, QuizAnswer},
        dto::request::GradeAnswerRequest,
    },
    services::{
        completion_client::CompletionClient, json_extract::parse_json_object,
        prompt_builder::build_grading_prompt,
    },
};

const MIN_KEYWORD_CHARS: usize = 4;
const MAX_REQUIRED_KEYWORDS: f64 = 3.0;

static TOKEN_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\p{P}]+").expect("valid token separator regex"));

/// Outcome of the offline keyword-overlap heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordGrade {
    pub is_correct: bool,
    pub matched: Vec<String>,
    pub eligible: usize,
    pub required: f64,
}

/// Grades an answer by counting reference keywords (longer than three
/// characters) that appear in the answer. At least `min(3, n / 3)` of the
/// `n` distinct keywords must be present, so a reference with no keyword
/// accepts any non-blank answer.
pub fn keyword_overlap_grade(reference_answer: &str, user_answer: &str) -> KeywordGrade {
    let answer = user_answer.trim().to_lowercase();

    let mut keywords: Vec<String> = Vec::new();
    for token in TOKEN_SEPARATOR.split(&reference_answer.to_lowercase()) {
        if token.chars().count() >= MIN_KEYWORD_CHARS && !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }

    if answer.is_empty() {
        return KeywordGrade {
            is_correct: false,
            matched: Vec::new(),
            eligible: keywords.len(),
            required: 0.0,
        };
    }

    let required = MAX_REQUIRED_KEYWORDS.min(keywords.len() as f64 / 3.0);
    let matched: Vec<String> = keywords
        .iter()
        .filter(|keyword| answer.contains(keyword.as_str()))
        .cloned()
        .collect();

    KeywordGrade {
        is_correct: matched.len() as f64 >= required,
        eligible: keywords.len(),
        matched,
        required,
    }
}

pub struct GradingService {
    client: Arc<dyn CompletionClient>,
}

impl GradingService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Grades a free-text answer with the model, falling back to keyword
    /// overlap on any failure. Never returns an error.
    pub async fn grade_free_text(&self, request: &GradeAnswerRequest) -> QuizAnswer {
        let question_id = request.question_id.clone().unwrap_or_default();

        let (is_correct, feedback, graded_by) = if request.user_answer.trim().is_empty() {
            (
                false,
                "Please write an answer so we can check it.".to_string(),
                GradedBy::KeywordFallback,
            )
        } else {
            match self.grade_remotely(request).await {
                Ok((is_correct, feedback)) => (is_correct, feedback, GradedBy::Model),
                Err(err) => {
                    log::warn!(
                        "Remote grading failed ({}), using keyword fallback",
                        err.error_code()
                    );
                    let grade = keyword_overlap_grade(&request.reference_answer, &request.user_answer);
                    let feedback = fallback_feedback(&grade, &request.reference_answer);
                    (grade.is_correct, feedback, GradedBy::KeywordFallback)
                }
            }
        };

        QuizAnswer {
            question_id,
            selected_option_indexes: None,
            free_text_answer: Some(request.user_answer.clone()),
            is_correct,
            feedback,
            graded_by,
        }
    }

    async fn grade_remotely(&self, request: &GradeAnswerRequest) -> AppResult<(bool, String)> {
        let prompt = build_grading_prompt(
            &request.question,
            &request.reference_answer,
            &request.user_answer,
        );
        let raw = self.client.complete(&prompt).await?;
        let value = parse_json_object(&raw)?;

        let is_correct = value
            .get("isCorrect")
            .and_then(Value::as_bool)
            .ok_or_else(|| {
                AppError::ResponseShape("grading response has no boolean isCorrect".to_string())
            })?;

        let feedback = value
            .get("feedback")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_feedback(is_correct).to_string());

        Ok((is_correct, feedback))
    }
}

fn default_feedback(is_correct: bool) -> &'static str {
    if is_correct {
        "That's right."
    } else {
        "That's not quite right. Check the discharge instructions again."
    }
}

fn fallback_feedback(grade: &KeywordGrade, reference_answer: &str) -> String {
    if grade.is_correct {
        "Your answer covers the key points.".to_string()
    } else {
        format!(
            "Your answer is missing some key points. The answer we were looking for: {}",
            reference_answer.trim()
        )
    }
}
