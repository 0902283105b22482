use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

pub const DEFAULT_SIMPLE_EXPLANATION: &str =
    "We could not create a simple explanation from this discharge summary. Please ask your child's care team to go over it with you.";

pub const DEFAULT_EXPECTED_COURSE: &str =
    "The discharge summary does not say what recovery should look like. Ask your child's doctor what to expect.";

/// Parent-friendly explanation of a discharge summary.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSummary {
    /// Two to four plain-language sentences describing why the child was in hospital and what happened.
    #[serde(default = "default_simple_explanation")]
    pub simple_explanation: String,
    /// Concrete things the family should do at home.
    #[serde(default)]
    pub what_to_do: Vec<String>,
    /// Things the family should avoid.
    #[serde(default)]
    pub what_not_to_do: Vec<String>,
    /// Warning signs that mean the family should seek urgent care.
    #[serde(default)]
    pub red_flags: Vec<String>,
    /// Medications listed in the discharge summary.
    #[serde(default)]
    pub medications: Vec<Medication>,
    /// Follow-up appointments, tests, or calls.
    #[serde(default)]
    pub follow_up: Vec<String>,
    /// What recovery is expected to look like.
    #[serde(default = "default_expected_course")]
    pub expected_course: String,
    /// Comprehension questions for the family.
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dose: String,
    #[serde(default)]
    pub timing: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_simple_explanation() -> String {
    DEFAULT_SIMPLE_EXPLANATION.to_string()
}

fn default_expected_course() -> String {
    DEFAULT_EXPECTED_COURSE.to_string()
}

impl Default for StructuredSummary {
    fn default() -> Self {
        Self {
            simple_explanation: default_simple_explanation(),
            what_to_do: Vec::new(),
            what_not_to_do: Vec::new(),
            red_flags: Vec::new(),
            medications: Vec::new(),
            follow_up: Vec::new(),
            expected_course: default_expected_course(),
            quiz_questions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_with_camel_case_keys() {
        let summary = StructuredSummary::default();
        let json = serde_json::to_value(&summary).expect("summary should serialize");

        for key in [
            "simpleExplanation",
            "whatToDo",
            "whatNotToDo",
            "redFlags",
            "medications",
            "followUp",
            "expectedCourse",
            "quizQuestions",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_partial_summary_deserializes_with_defaults() {
        let summary: StructuredSummary =
            serde_json::from_str(r#"{"redFlags": ["Trouble breathing"]}"#)
                .expect("partial summary should deserialize");

        assert_eq!(summary.red_flags, vec!["Trouble breathing".to_string()]);
        assert!(summary.what_to_do.is_empty());
        assert_eq!(summary.expected_course, DEFAULT_EXPECTED_COURSE);
        assert_eq!(summary.simple_explanation, DEFAULT_SIMPLE_EXPLANATION);
    }

    #[test]
    fn test_medication_notes_are_omitted_when_absent() {
        let medication = Medication {
            name: "Paracetamol".to_string(),
            dose: "15 mg/kg".to_string(),
            timing: "every 6 hours".to_string(),
            notes: None,
        };

        let json = serde_json::to_value(&medication).expect("medication should serialize");
        assert!(json.get("notes").is_none());
    }
}
