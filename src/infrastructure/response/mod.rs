use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when there is no model text at all; parses as an empty array.
pub const EMPTY_JSON_ARRAY: &str = "[]";

static CODE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?\s*").unwrap());

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Pulls the JSON array or object out of raw model output.
///
/// Markdown fences are removed wherever they occur. If the first `[` comes
/// before any `{`, the span from the first `[` to the last `]` is kept; if the
/// first `{` comes first, the span from the first `{` to the last `}`. The
/// object rule is checked after the array rule against the same positions, so
/// it wins whenever both would apply. Text without brackets is returned as-is
/// (trimmed) and will fail to parse downstream.
///
/// Never fails: missing or empty input yields `"[]"`.
pub fn extract_json(text: Option<&str>) -> String {
    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => return EMPTY_JSON_ARRAY.to_string(),
    };

    let stripped = CODE_FENCE_PATTERN.replace_all(text.trim(), "");
    let stripped = stripped.as_ref();

    let first_bracket = stripped.find('[');
    let first_brace = stripped.find('{');
    let last_bracket = stripped.rfind(']');
    let last_brace = stripped.rfind('}');

    let mut working = stripped;

    if let (Some(start), Some(end)) = (first_bracket, last_bracket) {
        let opens_first = first_brace.map_or(true, |brace| start < brace);
        if end > start && opens_first {
            working = &stripped[start..=end];
        }
    }

    if let (Some(start), Some(end)) = (first_brace, last_brace) {
        let opens_first = first_bracket.map_or(true, |bracket| start < bracket);
        if end > start && opens_first {
            working = &stripped[start..=end];
        }
    }

    working.trim().to_string()
}

/// Removes reasoning tags some models emit and collapses runs of blank lines.
pub fn clean_llm_response(response: &str) -> String {
    let cleaned = THINK_TAG_PATTERN.replace_all(response, "");
    let cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "");

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(cleaned.trim(), "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_empty_input() {
        assert_eq!(extract_json(None), "[]");
        assert_eq!(extract_json(Some("")), "[]");
    }

    #[test]
    fn test_text_without_brackets_is_trimmed() {
        assert_eq!(
            extract_json(Some("  I cannot describe this image.  ")),
            "I cannot describe this image."
        );
    }

    #[test]
    fn test_fenced_array() {
        assert_eq!(extract_json(Some("```json\n[1,2,3]\n```")), "[1,2,3]");
        assert_eq!(extract_json(Some("```\n[1,2,3]\n```")), "[1,2,3]");
    }

    #[test]
    fn test_fences_removed_anywhere() {
        let input = "Here you go:\n```json\n[\"a\", \"b\"]\n```\nEnjoy!";
        assert_eq!(extract_json(Some(input)), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_object_in_prose() {
        assert_eq!(extract_json(Some(r#"prefix {"a":1} suffix"#)), r#"{"a":1}"#);
    }

    #[test]
    fn test_array_in_prose() {
        assert_eq!(extract_json(Some("prefix [1,2] suffix")), "[1,2]");
    }

    #[test]
    fn test_object_containing_array_keeps_object() {
        assert_eq!(
            extract_json(Some(r#"{"items": [1,2,3]}"#)),
            r#"{"items": [1,2,3]}"#
        );
    }

    #[test]
    fn test_array_of_objects_keeps_array() {
        let input = r#"Sure! [{"text": "a"}, {"text": "b"}] Hope it helps"#;
        assert_eq!(
            extract_json(Some(input)),
            r#"[{"text": "a"}, {"text": "b"}]"#
        );
    }

    #[test]
    fn test_object_followed_by_array() {
        // The first opening character is `{`, so the object span wins.
        assert_eq!(extract_json(Some(r#"{"a":1} then [1,2]"#)), r#"{"a":1}"#);
    }

    #[test]
    fn test_array_followed_by_object() {
        assert_eq!(
            extract_json(Some(r#"[1,2] then {"a":1}"#)),
            r#"[1,2]"#
        );
    }

    #[test]
    fn test_multiple_arrays_take_widest_span() {
        assert_eq!(
            extract_json(Some("[1] and also [2]")),
            "[1] and also [2]"
        );
    }

    #[test]
    fn test_reversed_brackets_are_ignored() {
        assert_eq!(extract_json(Some("] nothing here [")), "] nothing here [");
    }

    #[test]
    fn test_multibyte_text_around_json() {
        assert_eq!(
            extract_json(Some("這是結果：[\"貼文一\", \"貼文二\"] 希望喜歡")),
            "[\"貼文一\", \"貼文二\"]"
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let inputs = [
            "prefix [1,2] suffix",
            r#"prefix {"a":1} suffix"#,
            r#"{"items": [1,2,3]}"#,
            r#"{"a":1} then [1,2]"#,
            "no json at all",
            "```json\n[\"x\"]\n```",
        ];
        for input in inputs {
            let once = extract_json(Some(input));
            assert_eq!(extract_json(Some(&once)), once, "input: {}", input);
        }
    }

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_reasoning_and_newlines() {
        let input = "<reasoning>hmm</reasoning>Line 1\n\n\n\n\nLine 2";
        assert_eq!(clean_llm_response(input), "Line 1\n\nLine 2");
    }
}
