use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::models::domain::{
    quiz_question::{MAX_OPTIONS, MIN_OPTIONS},
    QuizCategory, QuizQuestion,
};

static META_ANSWERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "all of the above",
        "all the above",
        "all above",
        "all of these",
        "all of them",
        "all of the answers above",
        "all answers are correct",
        "all are correct",
        "none of the above",
        "none the above",
        "none above",
        "none of these",
        "none of them",
        "none are correct",
        "both of the above",
        "both of these",
        "both a and b",
        "a and b",
        "both",
        "neither of the above",
        "neither",
    ]
    .into_iter()
    .collect()
});

// "D) ", "c. ", "(b) " style labels some models prepend to options
static OPTION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\(?[a-f][\).:]\s+").expect("valid option label regex"));

fn fold_option(option: &str) -> String {
    let unlabeled = OPTION_LABEL.replace(option.trim(), "");
    unlabeled
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn is_meta_answer(option: &str) -> bool {
    META_ANSWERS.contains(fold_option(option).as_str())
}

/// Sanitizes the model's `quizQuestions` value. Anything that is not an array
/// yields no questions.
pub fn sanitize_quiz_questions(raw: &Value) -> Vec<QuizQuestion> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    let mut used_ids = HashSet::new();
    let questions: Vec<QuizQuestion> = items
        .iter()
        .filter_map(|item| sanitize_question(item, &mut used_ids))
        .collect();

    if questions.len() < items.len() {
        log::warn!(
            "Discarded {} of {} quiz questions during sanitizing",
            items.len() - questions.len(),
            items.len()
        );
    }

    questions
}

fn sanitize_question(item: &Value, used_ids: &mut HashSet<String>) -> Option<QuizQuestion> {
    let question = item
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())?
        .to_string();

    let raw_options = item.get("options").and_then(Value::as_array)?;
    if raw_options.len() < MIN_OPTIONS {
        return None;
    }

    // (original index, text) for every option that survives filtering
    let surviving: Vec<(usize, String)> = raw_options
        .iter()
        .enumerate()
        .filter_map(|(index, option)| option_text(option).map(|text| (index, text)))
        .filter(|(_, text)| !is_meta_answer(text))
        .take(MAX_OPTIONS)
        .collect();

    if surviving.len() < MIN_OPTIONS {
        return None;
    }

    let correct_option_indexes = remap_correct_indexes(item, &surviving);
    let options = surviving.into_iter().map(|(_, text)| text).collect();

    let category = item
        .get("category")
        .and_then(Value::as_str)
        .map(QuizCategory::parse_lenient)
        .unwrap_or(QuizCategory::Care);

    let weight = item
        .get("weight")
        .and_then(Value::as_f64)
        .map(|w| w.round().clamp(0.0, 100.0) as u8)
        .unwrap_or_else(|| category.default_weight());

    let explanation = item
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    let id = assign_id(item.get("id"), used_ids);

    Some(QuizQuestion {
        id,
        question,
        options,
        correct_option_indexes,
        category,
        explanation,
        weight,
    })
}

fn option_text(option: &Value) -> Option<String> {
    let text = match option {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Maps the model's indexes onto positions in the surviving option list.
/// Indexes that pointed at removed options, or were not integers, are dropped.
/// An empty result becomes `[0]`.
fn remap_correct_indexes(item: &Value, surviving: &[(usize, String)]) -> Vec<usize> {
    let raw_indexes: Vec<&Value> = match item.get("correctOptionIndexes") {
        Some(Value::Array(values)) => values.iter().collect(),
        Some(single @ Value::Number(_)) => vec![single],
        _ => item.get("correctOptionIndex").into_iter().collect(),
    };

    let remapped: BTreeSet<usize> = raw_indexes
        .into_iter()
        .filter_map(as_index)
        .filter_map(|original| surviving.iter().position(|(index, _)| *index == original))
        .collect();

    if remapped.is_empty() {
        return vec![0];
    }
    remapped.into_iter().collect()
}

fn as_index(value: &Value) -> Option<usize> {
    if let Some(index) = value.as_u64() {
        return usize::try_from(index).ok();
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as usize)
}

fn assign_id(raw: Option<&Value>, used_ids: &mut HashSet<String>) -> String {
    let provided = match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let id = match provided {
        Some(id) if !used_ids.contains(&id) => id,
        _ => format!("q-{}", Uuid::new_v4()),
    };
    used_ids.insert(id.clone());
    id
}
