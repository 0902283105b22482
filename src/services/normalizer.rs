use serde_json::Value;

use crate::{
    errors::AppResult,
    models::domain::{
        structured_summary::{DEFAULT_EXPECTED_COURSE, DEFAULT_SIMPLE_EXPLANATION},
        Medication, StructuredSummary,
    },
    services::{json_extract::parse_json_object, quiz_sanitizer::sanitize_quiz_questions},
};

/// Extracts, parses, and normalizes the model's raw text.
///
/// Only locating and parsing the JSON can fail. Once there is an object,
/// every malformed or missing field is replaced by its documented default.
pub fn normalize_response(raw: &str) -> AppResult<StructuredSummary> {
    let value = parse_json_object(raw)?;
    Ok(normalize_value(&value))
}

pub fn normalize_value(value: &Value) -> StructuredSummary {
    StructuredSummary {
        simple_explanation: text_or_default(
            field(value, "simpleExplanation"),
            DEFAULT_SIMPLE_EXPLANATION,
        ),
        what_to_do: string_list(field(value, "whatToDo")),
        what_not_to_do: string_list(field(value, "whatNotToDo")),
        red_flags: string_list(field(value, "redFlags")),
        medications: medication_list(field(value, "medications")),
        follow_up: string_list(field(value, "followUp")),
        expected_course: text_or_default(field(value, "expectedCourse"), DEFAULT_EXPECTED_COURSE),
        quiz_questions: sanitize_quiz_questions(field(value, "quizQuestions")),
    }
}

static NULL: Value = Value::Null;

fn field<'a>(value: &'a Value, name: &str) -> &'a Value {
    value.get(name).unwrap_or(&NULL)
}

fn text_or_default(value: &Value, default: &str) -> String {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(non_blank).collect())
        .unwrap_or_default()
}

fn medication_list(value: &Value) -> Vec<Medication> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(medication).collect())
        .unwrap_or_default()
}

fn medication(item: &Value) -> Option<Medication> {
    match item {
        // a bare string is taken as the name and nothing else
        Value::String(_) => non_blank(item).map(|name| Medication {
            name,
            ..Medication::default()
        }),
        Value::Object(fields) => {
            let get = |key: &str| fields.get(key).and_then(non_blank);
            let name = get("name")?;
            Some(Medication {
                name,
                dose: get("dose").unwrap_or_default(),
                timing: get("timing").unwrap_or_default(),
                notes: get("notes"),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use serde_json::json;

    #[test]
    fn test_non_array_field_becomes_empty() {
        let summary = normalize_value(&json!({
            "simpleExplanation": "Your child had a fever and is getting better.",
            "whatToDo": "Give paracetamol every 6 hours",
            "redFlags": {"first": "Trouble breathing"}
        }));

        assert!(summary.what_to_do.is_empty());
        assert!(summary.red_flags.is_empty());
    }

    #[test]
    fn test_missing_fields_get_documented_defaults() {
        let summary = normalize_value(&json!({}));

        assert_eq!(summary, StructuredSummary::default());
        assert_eq!(summary.expected_course, DEFAULT_EXPECTED_COURSE);
        assert_eq!(summary.simple_explanation, DEFAULT_SIMPLE_EXPLANATION);
    }

    #[test]
    fn test_falsy_text_fields_fall_back() {
        let summary = normalize_value(&json!({
            "simpleExplanation": "",
            "expectedCourse": null
        }));

        assert_eq!(summary.simple_explanation, DEFAULT_SIMPLE_EXPLANATION);
        assert_eq!(summary.expected_course, DEFAULT_EXPECTED_COURSE);
    }

    #[test]
    fn test_non_string_list_items_are_dropped_not_invented() {
        let summary = normalize_value(&json!({
            "whatToDo": ["Rest at home", 42, null, "", {"x": 1}, "Drink fluids"]
        }));

        assert_eq!(summary.what_to_do, vec!["Rest at home", "Drink fluids"]);
    }

    #[test]
    fn test_medications_are_coerced_leniently() {
        let summary = normalize_value(&json!({
            "medications": [
                {"name": "Paracetamol", "dose": "15 mg/kg", "timing": "every 6 hours"},
                {"name": "Amoxicillin", "dose": "250 mg", "timing": "twice daily", "notes": "Finish the full course"},
                {"dose": "5 ml"},
                "Ibuprofen",
                7
            ]
        }));

        assert_eq!(summary.medications.len(), 3);
        assert_eq!(summary.medications[0].timing, "every 6 hours");
        assert_eq!(summary.medications[0].notes, None);
        assert_eq!(
            summary.medications[1].notes.as_deref(),
            Some("Finish the full course")
        );
        assert_eq!(summary.medications[2].name, "Ibuprofen");
        assert!(summary.medications[2].dose.is_empty());
    }

    #[test]
    fn test_normalizes_fenced_response_with_trailing_prose() {
        let summary = normalize_response(&fixtures::fenced_model_response()).unwrap();

        assert_eq!(summary.medications[0].name, "Paracetamol");
        assert!(!summary.red_flags.is_empty());
        assert_eq!(summary.quiz_questions[0].options.len(), 2);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize_response(&fixtures::fenced_model_response()).unwrap();
        let reserialized = serde_json::to_string(&first).unwrap();
        let second = normalize_response(&reserialized).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_idempotent_for_defaults_and_generated_ids() {
        let first = normalize_value(&json!({
            "quizQuestions": [{"question": "a", "options": ["x", "y", "All of the above"]}]
        }));
        let second = normalize_value(&serde_json::to_value(&first).unwrap());

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_json_is_an_error() {
        assert!(normalize_response("Sorry, I can't do that.").is_err());
    }
}
