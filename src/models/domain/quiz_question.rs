use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    /// Two to four answer choices.
    pub options: Vec<String>,
    /// Zero-based indexes into `options` of every correct choice.
    pub correct_option_indexes: Vec<usize>,
    pub category: QuizCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Importance from 0 to 100.
    pub weight: u8,
}

impl QuizQuestion {
    pub fn is_multi_select(&self) -> bool {
        self.correct_option_indexes.len() > 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuizCategory {
    RedFlag,
    Medication,
    Care,
    FollowUp,
}

impl QuizCategory {
    /// Lenient parse of a model-supplied category. Unknown values map to `Care`.
    pub fn parse_lenient(value: &str) -> Self {
        let folded: String = value
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match folded.as_str() {
            "redflag" | "redflags" | "warning" | "emergency" => QuizCategory::RedFlag,
            "medication" | "medications" | "medicine" => QuizCategory::Medication,
            "followup" | "followups" => QuizCategory::FollowUp,
            _ => QuizCategory::Care,
        }
    }

    pub fn default_weight(self) -> u8 {
        match self {
            QuizCategory::RedFlag => 30,
            QuizCategory::Medication => 25,
            QuizCategory::FollowUp => 20,
            QuizCategory::Care => 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_category_round_trip_serialization() {
        let variants = [
            QuizCategory::RedFlag,
            QuizCategory::Medication,
            QuizCategory::Care,
            QuizCategory::FollowUp,
        ];

        for variant in variants {
            let json = serde_json::to_string(&variant).expect("variant should serialize");
            let parsed: QuizCategory =
                serde_json::from_str(&json).expect("variant should deserialize");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn test_quiz_category_uses_camel_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&QuizCategory::RedFlag).unwrap(),
            "\"redFlag\""
        );
        assert_eq!(
            serde_json::to_string(&QuizCategory::FollowUp).unwrap(),
            "\"followUp\""
        );
    }

    #[test]
    fn test_parse_lenient_accepts_spelling_variants() {
        assert_eq!(QuizCategory::parse_lenient("red_flag"), QuizCategory::RedFlag);
        assert_eq!(QuizCategory::parse_lenient("Red Flag"), QuizCategory::RedFlag);
        assert_eq!(QuizCategory::parse_lenient("follow-up"), QuizCategory::FollowUp);
        assert_eq!(QuizCategory::parse_lenient("MEDICATION"), QuizCategory::Medication);
        assert_eq!(QuizCategory::parse_lenient("diet"), QuizCategory::Care);
        assert_eq!(QuizCategory::parse_lenient(""), QuizCategory::Care);
    }

    #[test]
    fn test_default_weights_follow_category_importance() {
        assert_eq!(QuizCategory::RedFlag.default_weight(), 30);
        assert_eq!(QuizCategory::Medication.default_weight(), 25);
        assert_eq!(QuizCategory::FollowUp.default_weight(), 20);
        assert_eq!(QuizCategory::Care.default_weight(), 15);
    }
}
