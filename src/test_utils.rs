#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{
        Medication, QuizCategory, QuizQuestion, StructuredSummary,
    };

    /// A short de-identified discharge summary
    pub fn discharge_text() -> String {
        "Age: 5 years. Admitted with febrile illness and dehydration. \
         Treated with IV fluids, now drinking well. \
         Medications on Discharge: Paracetamol 15 mg/kg every 6 hours as needed for fever. \
         Follow up with GP in 3 days. Return if breathing difficulty or no urine for 8 hours."
            .to_string()
    }

    /// A model response wrapped in a fence, followed by chatty prose
    pub fn fenced_model_response() -> String {
        r#"```json
{
  "simpleExplanation": "Your child came to hospital with a fever and was dry. Fluids helped and your child is drinking well now.",
  "whatToDo": ["Offer drinks often", "Give paracetamol for fever if needed"],
  "whatNotToDo": ["Do not give more paracetamol than every 6 hours"],
  "redFlags": ["Breathing looks hard", "No wet nappy or pee for 8 hours"],
  "medications": [
    {"name": "Paracetamol", "dose": "15 mg/kg", "timing": "every 6 hours as needed", "notes": "Only for fever {above 38C}"}
  ],
  "followUp": ["See your GP in 3 days"],
  "expectedCourse": "Fever should settle over the next few days.",
  "quizQuestions": [
    {
      "id": "q1",
      "question": "What should you do if your child has trouble breathing?",
      "options": ["Call the doctor", "Go to ER", "All of the above"],
      "correctOptionIndexes": [0, 1, 2],
      "category": "redFlag",
      "explanation": "Breathing trouble needs urgent care."
    },
    {
      "id": "q2",
      "question": "How often can paracetamol be given?",
      "options": ["Every 2 hours", "Every 6 hours", "Once a week"],
      "correctOptionIndexes": [1],
      "category": "medication"
    }
  ]
}
```
Let me know if you would like this in another language."#
            .to_string()
    }

    pub fn quiz_question() -> QuizQuestion {
        QuizQuestion {
            id: "q1".to_string(),
            question: "What should you do if your child has trouble breathing?".to_string(),
            options: vec!["Call the doctor".to_string(), "Go to ER".to_string()],
            correct_option_indexes: vec![0, 1],
            category: QuizCategory::RedFlag,
            explanation: Some("Breathing trouble needs urgent care.".to_string()),
            weight: 30,
        }
    }

    pub fn medication_question() -> QuizQuestion {
        QuizQuestion {
            id: "q2".to_string(),
            question: "How often can paracetamol be given?".to_string(),
            options: vec![
                "Every 2 hours".to_string(),
                "Every 6 hours".to_string(),
                "Once a week".to_string(),
            ],
            correct_option_indexes: vec![1],
            category: QuizCategory::Medication,
            explanation: None,
            weight: 25,
        }
    }

    pub fn summary() -> StructuredSummary {
        StructuredSummary {
            simple_explanation: "Your child had a fever and was dry. Your child is drinking well now."
                .to_string(),
            what_to_do: vec!["Offer drinks often".to_string()],
            what_not_to_do: vec!["Do not give more paracetamol than every 6 hours".to_string()],
            red_flags: vec!["Breathing looks hard".to_string()],
            medications: vec![Medication {
                name: "Paracetamol".to_string(),
                dose: "15 mg/kg".to_string(),
                timing: "every 6 hours as needed".to_string(),
                notes: None,
            }],
            follow_up: vec!["See your GP in 3 days".to_string()],
            expected_course: "Fever should settle over the next few days.".to_string(),
            quiz_questions: vec![quiz_question(), medication_question()],
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_summary_questions_are_consistent() {
        let summary = summary();
        for question in &summary.quiz_questions {
            assert!(question.options.len() >= 2);
            assert!(question
                .correct_option_indexes
                .iter()
                .all(|i| *i < question.options.len()));
        }
    }

    #[test]
    fn test_fixture_response_contains_fence_and_prose() {
        let response = fenced_model_response();
        assert!(response.starts_with("```json"));
        assert!(response.ends_with("another language."));
    }
}
