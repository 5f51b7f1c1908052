//! Model response normalizer for the suggest capability.
//!
//! Model output is untrusted text that should hold a JSON object. Parsing runs in
//! two explicit stages (strict, then the span between the first `{` and the last
//! `}`); if both fail the fallback is returned untouched. A parsed object is then
//! merged over the fallback field by field through [`FIELD_RULES`]: a field is
//! taken from the model only when it is present, truthy and of a usable shape.
//!
//! `confidence` is the one exception: a present, truthy value that cannot be read
//! as a number fails the whole request with [`NormalizeError::Confidence`].

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::heuristics::{Severity, MAX_TAGS};
use crate::incidents::models::SuggestResult;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("confidence is not numeric: {0}")]
    Confidence(String),
}

/// Outcome of the two-stage parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutput {
    /// The whole text was a JSON object.
    Strict(Map<String, Value>),
    /// A JSON object was recovered from between the outermost braces.
    Extracted(Map<String, Value>),
    Failure,
}

/// Stage 1: the trimmed text must be exactly one JSON object.
pub fn parse_strict(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Stage 2: parse the span from the first `{` to the last `}` inclusive.
/// Tolerates prose and markdown fences around the object.
pub fn parse_braced(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    parse_strict(&raw[start..=end])
}

pub fn parse_model_json(raw: &str) -> ParsedOutput {
    if let Some(object) = parse_strict(raw) {
        return ParsedOutput::Strict(object);
    }
    match parse_braced(raw) {
        Some(object) => ParsedOutput::Extracted(object),
        None => ParsedOutput::Failure,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field table
// ────────────────────────────────────────────────────────────────────────────

type Merge = fn(&Value, &mut SuggestResult) -> Result<(), NormalizeError>;

/// One wire key and how to merge a truthy model value for it into a result
/// that starts out as the fallback. A merge that rejects the value leaves the
/// fallback's value in place.
pub struct FieldRule {
    pub key: &'static str,
    merge: Merge,
}

pub const FIELD_RULES: [FieldRule; 8] = [
    FieldRule {
        key: "summary",
        merge: |value, out| {
            if let Some(text) = non_blank_text(value) {
                out.summary = text;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "suggestedTitle",
        merge: |value, out| {
            if let Some(text) = non_blank_text(value) {
                out.suggested_title = text;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "impactSummary",
        merge: |value, out| {
            if let Some(text) = non_blank_text(value) {
                out.impact_summary = text;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "actionItems",
        merge: |value, out| {
            if let Some(items) = string_list(value) {
                out.action_items = items;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "severityProposed",
        merge: |value, out| {
            if let Some(severity) = value.as_str().and_then(Severity::parse) {
                out.severity_proposed = severity;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "statusProposed",
        merge: |value, out| {
            if let Some(text) = non_blank_text(value) {
                out.status_proposed = text;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "tags",
        merge: |value, out| {
            if let Some(tags) = string_list(value).map(dedupe_tags) {
                out.tags = tags;
            }
            Ok(())
        },
    },
    FieldRule {
        key: "confidence",
        merge: |value, out| {
            out.confidence = coerce_confidence(value)?;
            Ok(())
        },
    },
];

/// Python-style truthiness: null, false, 0, "", [] and {} are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn non_blank_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// String elements of an array, skipping blanks and non-strings. `None` if nothing survives.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(non_blank_text)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Case-insensitive de-duplication keeping the first spelling, capped at [`MAX_TAGS`].
fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .take(MAX_TAGS)
        .collect()
}

fn coerce_confidence(value: &Value) -> Result<f64, NormalizeError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(true) => Some(1.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n.clamp(0.0, 1.0)),
        _ => Err(NormalizeError::Confidence(value.to_string())),
    }
}

/// Reconciles raw model output with the fallback result for the same request.
pub fn normalize_suggest(
    raw: &str,
    fallback: SuggestResult,
) -> Result<SuggestResult, NormalizeError> {
    let object = match parse_model_json(raw) {
        ParsedOutput::Strict(object) | ParsedOutput::Extracted(object) => object,
        ParsedOutput::Failure => {
            warn!("Suggest output is not a JSON object, using heuristic result");
            return Ok(fallback);
        }
    };

    let mut result = fallback;
    for rule in &FIELD_RULES {
        if let Some(value) = object.get(rule.key).filter(|v| is_truthy(v)) {
            (rule.merge)(value, &mut result)?;
        }
    }
    Ok(result)
}
