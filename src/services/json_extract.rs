use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

const PREVIEW_CHARS: usize = 200;

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*```[a-z0-9_-]*[ \t]*\r?\n?").expect("valid fence regex"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?[ \t]*```\s*$").expect("valid fence regex"));

/// Removes a leading ```` ```json ```` (any case) and a trailing ```` ``` ```` if present.
pub fn strip_fences(raw: &str) -> &str {
    let start = LEADING_FENCE.find(raw).map(|m| m.end()).unwrap_or(0);
    let rest = &raw[start..];
    let end = TRAILING_FENCE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    rest[..end].trim()
}

/// Returns the first balanced `{ ... }` object in `raw`.
///
/// Braces inside string literals are ignored, so `{"note": "use {dose}"}`
/// is returned whole. Anything after the matching brace is discarded.
pub fn extract_json_object(raw: &str) -> AppResult<&str> {
    let text = strip_fences(raw);
    let start = text.find('{').ok_or_else(|| AppError::NoJsonFound {
        preview: preview(raw),
    })?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(AppError::IncompleteJson {
        preview: preview(&text[start..]),
    })
}

/// Locates and parses the JSON object in a model response.
pub fn parse_json_object(raw: &str) -> AppResult<Value> {
    let candidate = extract_json_object(raw)?;
    serde_json::from_str(candidate).map_err(|e| AppError::JsonParse {
        message: e.to_string(),
        preview: preview(candidate),
    })
}

pub fn preview(text: &str) -> String {
    let trimmed = text.trim();
    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_bare_object() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extracts_object_surrounded_by_prose() {
        let raw = r#"Here is the result: {"a": {"b": 2}} Let me know if you need more."#;
        assert_eq!(extract_json_object(raw).unwrap(), r#"{"a": {"b": 2}}"#);
    }

    #[test]
    fn test_extracts_fenced_object_and_drops_trailing_sentence() {
        let raw = "```json\n{\"whatToDo\": [\"Rest\"]}\n```\nI hope this helps the family.";
        let value = parse_json_object(raw).unwrap();

        assert_eq!(value, json!({"whatToDo": ["Rest"]}));
    }

    #[test]
    fn test_strips_uppercase_fence_tag() {
        let raw = "```JSON\n{\"a\": true}\n```";
        assert_eq!(strip_fences(raw), "{\"a\": true}");
        assert_eq!(extract_json_object(raw).unwrap(), "{\"a\": true}");
    }

    #[test]
    fn test_ignores_braces_inside_strings() {
        let raw = r#"{"notes": "give {half} dose", "quote": "she said \"}\""} trailing }"#;
        let extracted = extract_json_object(raw).unwrap();

        assert_eq!(
            extracted,
            r#"{"notes": "give {half} dose", "quote": "she said \"}\""}"#
        );
        assert!(serde_json::from_str::<Value>(extracted).is_ok());
    }

    #[test]
    fn test_takes_only_the_first_object() {
        let raw = r#"{"first": 1} {"second": 2}"#;
        assert_eq!(extract_json_object(raw).unwrap(), r#"{"first": 1}"#);
    }

    #[test]
    fn test_missing_brace_is_no_json_found() {
        assert!(matches!(
            extract_json_object("I cannot help with that."),
            Err(AppError::NoJsonFound { .. })
        ));
    }

    #[test]
    fn test_unbalanced_braces_are_incomplete() {
        assert!(matches!(
            extract_json_object(r#"{"a": {"b": 1}"#),
            Err(AppError::IncompleteJson { .. })
        ));
    }

    #[test]
    fn test_parse_failure_carries_message_and_preview() {
        match parse_json_object(r#"{"a": tru}"#) {
            Err(AppError::JsonParse { message, preview }) => {
                assert!(!message.is_empty());
                assert_eq!(preview, r#"{"a": tru}"#);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_is_bounded() {
        let long = "x".repeat(1000);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
    }
}
