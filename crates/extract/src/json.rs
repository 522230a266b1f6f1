//! Recovery of a JSON object from free-form model output.
//!
//! Stages, in order: the whole response, a ```json fenced block, any fenced
//! block, then the span from the first `{` to the last `}`.

use analysis::PartialAnalysis;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::ProviderError;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").expect("fenced json pattern is valid"));

static FENCED_ANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*(.*?)```").expect("fenced block pattern is valid")
});

static BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("braced object pattern is valid"));

/// Characters of the raw response echoed back in errors.
const PREVIEW_CHARS: usize = 200;

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

pub fn extract_json(raw: &str) -> Result<Value, ProviderError> {
    if let Some(value) = parse_object(raw) {
        return Ok(value);
    }

    for pattern in [&*FENCED_JSON, &*FENCED_ANY] {
        let candidate = pattern
            .captures(raw)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_object(m.as_str()));
        if let Some(value) = candidate {
            return Ok(value);
        }
    }

    if let Some(value) = BRACED.find(raw).and_then(|m| parse_object(m.as_str())) {
        return Ok(value);
    }

    let preview: String = raw.chars().take(PREVIEW_CHARS).collect();
    Err(ProviderError::InvalidJson(preview))
}

/// Parse model output into a partial analysis.
pub fn parse_partial(raw: &str) -> Result<PartialAnalysis, ProviderError> {
    let value = extract_json(raw)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_json() {
        let value = extract_json(r#" {"summary": "ok"} "#).unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[test]
    fn test_fenced_json_block() {
        let raw = "Here you go:\n```json\n{\"summary\": \"fenced\"}\n```\nThanks!";
        assert_eq!(extract_json(raw).unwrap()["summary"], "fenced");
    }

    #[test]
    fn test_untagged_fenced_block() {
        let raw = "Result:\n```\n{\"summary\": \"plain fence\"}\n```";
        assert_eq!(extract_json(raw).unwrap()["summary"], "plain fence");
    }

    #[test]
    fn test_braced_span_in_prose() {
        let raw = "Sure! The analysis is {\"summary\": \"inline\", \"compliance\": {\"gdpr_mentioned\": true}} as requested.";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["compliance"]["gdpr_mentioned"], true);
    }

    #[test]
    fn test_bad_fence_falls_through_to_braces() {
        let raw = "```json\nnot json\n``` but later {\"summary\": \"recovered\"}";
        assert_eq!(extract_json(raw).unwrap()["summary"], "recovered");
    }

    #[test]
    fn test_unrecoverable_output_fails() {
        assert!(matches!(
            extract_json("I cannot analyze this policy."),
            Err(ProviderError::InvalidJson(_))
        ));
        assert!(extract_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_parse_partial_maps_schema() {
        let partial = parse_partial(
            "```json\n{\"user_rights\": {\"deletion\": true, \"rights_score\": 7}}\n```",
        )
        .unwrap();

        let rights = partial.user_rights.unwrap();
        assert_eq!(rights.deletion, Some(true));
        assert_eq!(rights.rights_score, Some(7.0));
    }

    #[test]
    fn test_parse_partial_rejects_wrong_types() {
        let err = parse_partial(r#"{"user_rights": {"deletion": "maybe"}}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Schema(_)));
    }
}
