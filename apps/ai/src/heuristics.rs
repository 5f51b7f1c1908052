//! Heuristic extractors: severity, tags and a one-line summary derived from raw
//! incident text. Pure and deterministic; no model involved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Incident severity. SEV1 is the most severe, SEV3 is the unclassified default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "SEV1")]
    Sev1,
    #[serde(rename = "SEV2")]
    Sev2,
    #[default]
    #[serde(rename = "SEV3")]
    Sev3,
    #[serde(rename = "SEV4")]
    Sev4,
    #[serde(rename = "SEV5")]
    Sev5,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Sev1 => "SEV1",
            Severity::Sev2 => "SEV2",
            Severity::Sev3 => "SEV3",
            Severity::Sev4 => "SEV4",
            Severity::Sev5 => "SEV5",
        }
    }

    /// Parses a level name such as `"sev2"` or `" SEV2 "`. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SEV1" => Some(Severity::Sev1),
            "SEV2" => Some(Severity::Sev2),
            "SEV3" => Some(Severity::Sev3),
            "SEV4" => Some(Severity::Sev4),
            "SEV5" => Some(Severity::Sev5),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword groups in priority order. The first group with any hit wins,
/// no matter where in the text the keyword sits. SEV3 has no keywords.
const SEVERITY_KEYWORDS: &[(Severity, &[&str])] = &[
    (
        Severity::Sev1,
        &["sev1", "p1", "major outage", "data loss", "total outage"],
    ),
    (
        Severity::Sev2,
        &["sev2", "p2", "outage", "5xx", "downtime", "critical"],
    ),
    (Severity::Sev4, &["sev4", "minor", "degraded"]),
    (Severity::Sev5, &["sev5", "cosmetic", "typo", "ui"]),
];

/// Tag vocabulary. Output order follows this list, not the input text.
pub const TAG_VOCABULARY: [&str; 17] = [
    "api", "billing", "auth", "db", "database", "sql", "cache", "redis", "queue", "kafka", "cdn",
    "network", "eu-west", "us-east", "latency", "5xx", "timeout",
];

pub const MAX_TAGS: usize = 8;

const SUMMARY_BASE_CHARS: usize = 80;
const SUMMARY_TAIL_CHARS: usize = 140;

/// Guesses a severity level from free text with a case-insensitive substring scan.
pub fn guess_severity(text: &str) -> Severity {
    let lowered = text.to_lowercase();
    SEVERITY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(severity, _)| *severity)
        .unwrap_or_default()
}

/// Returns the vocabulary keywords found in `text`, in vocabulary order, at most
/// [`MAX_TAGS`] of them.
pub fn extract_tags(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TAG_VOCABULARY
        .iter()
        .filter(|tag| lowered.contains(*tag))
        .take(MAX_TAGS)
        .map(|tag| tag.to_string())
        .collect()
}

/// Builds `"<title> — <description head>"`, degrading to the description head
/// or the literal `"Incident"` when inputs are empty.
pub fn build_basic_summary(title: &str, description: &str) -> String {
    let title = title.trim();
    let description = description.trim();

    let base = if !title.is_empty() {
        title.to_string()
    } else if !description.is_empty() {
        take_chars(description, SUMMARY_BASE_CHARS)
    } else {
        "Incident".to_string()
    };

    if !description.is_empty() && description != base {
        let tail = truncate_with_ellipsis(description, SUMMARY_TAIL_CHARS);
        return format!("{base} — {tail}");
    }
    base
}

/// First `max` characters of `text` (chars, not bytes).
pub fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Like [`take_chars`] but appends `…` when something was cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let mut out = take_chars(text, max);
    if text.chars().count() > max {
        out.push('…');
    }
    out
}
