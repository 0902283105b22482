use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::{QuizAnswer, QuizQuestion, StructuredSummary};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub discharge_text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeAnswerRequest {
    #[serde(default)]
    pub question_id: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub question: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub reference_answer: String,

    // blank answers are graded, not rejected
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub user_answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    pub question: QuizQuestion,
    #[serde(default)]
    pub selected_option_indexes: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreQuizRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one question is required"))]
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub answers: Vec<QuizAnswer>,
}

/// One answered question as reported by the quiz screen.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizResultEntry {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExportPdfRequest {
    #[serde(default)]
    pub summary: StructuredSummary,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub quiz_score: Option<f64>,
    #[serde(default)]
    pub quiz_results: Vec<QuizResultEntry>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendQuizResultsRequest {
    #[serde(default)]
    #[validate(contains(pattern = "@", message = "doctorEmail must be an email address"))]
    pub doctor_email: String,

    #[serde(default)]
    pub quiz_score: f64,

    #[serde(default)]
    pub quiz_data: Vec<QuizResultEntry>,

    #[serde(default)]
    pub summary: Option<StructuredSummary>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub patient_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn send_request(email: &str, patient_id: &str) -> SendQuizResultsRequest {
        SendQuizResultsRequest {
            doctor_email: email.to_string(),
            quiz_score: 80.0,
            quiz_data: vec![],
            summary: None,
            patient_id: patient_id.to_string(),
        }
    }

    #[test]
    fn test_valid_send_request() {
        assert!(send_request("dr.lee@clinic.org", "MRN-001").validate().is_ok());
    }

    #[test]
    fn test_email_without_at_sign_is_invalid() {
        assert!(send_request("dr.lee.clinic.org", "MRN-001").validate().is_err());
    }

    #[test]
    fn test_blank_patient_id_is_invalid() {
        assert!(send_request("dr.lee@clinic.org", "   ").validate().is_err());
    }

    #[test]
    fn test_blank_discharge_text_is_invalid() {
        let request = ExplainRequest {
            discharge_text: "\n\t ".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_missing_fields_deserialize_to_invalid_request() {
        let request: SendQuizResultsRequest =
            serde_json::from_str("{}").expect("empty body should deserialize");
        let errors = request.validate().expect_err("empty body should fail validation");
        let fields = errors.field_errors();

        assert!(fields.contains_key("doctor_email"));
        assert!(fields.contains_key("patient_id"));
    }

    #[test]
    fn test_grade_request_allows_blank_user_answer() {
        let request = GradeAnswerRequest {
            question_id: None,
            question: "What should you avoid?".to_string(),
            reference_answer: "Juice and soda".to_string(),
            user_answer: String::new(),
        };
        assert!(request.validate().is_ok());
    }
}
