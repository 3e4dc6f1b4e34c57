//! Duration and level extraction from flattened page text.
//!
//! Durations are captured as text, not parsed into quantities; the record
//! keeps whatever the page said ("45 mins", "2 hrs 30 mins").

use std::sync::LazyLock;

use regex::Regex;

const MAX_DURATION_LENGTH: usize = 100;

/// Priority-ordered duration patterns, each with one capture group:
/// explicit labels first, then phrases, then bare numeric-plus-unit.
/// The flattened text has no line breaks to stop at, so every capture is
/// anchored on a numeric-plus-unit form rather than "rest of line".
static DURATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:Duration|Estimated\s+time|Course\s+length|Time|Length):\s*(\d+\s*(?:hours?|hrs?|minutes?|mins?)(?:\s+\d+\s*(?:minutes?|mins?))?)",
        r"(?i)(?:Takes?|Lasts?)\s+(?:about\s+)?(\d+\s*(?:minutes?|mins?|hours?|hrs?))",
        r"(?i)(\d+\s*(?:hours?|hrs?))",
        r"(?i)(\d+\s*(?:minutes?|mins?))",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("duration pattern"))
    .collect()
});

/// Unlabeled hours-and-minutes form, normalised to "H hrs M mins".
/// Checked before the single-unit patterns so "2 hours 30 minutes" is not
/// truncated to "2 hours".
static COMBINED_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:hours?|hrs?)\s*(\d+)\s*(?:minutes?|mins?)")
        .expect("combined duration pattern")
});

static LEVEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:Level|Difficulty):\s*(Beginner|Intermediate|Advanced|Expert|Basic|Introductory)",
        r"(?i)(?:Level|Difficulty):\s*([A-Za-z][A-Za-z ]{0,40})",
        r"(?i)\b(Beginner|Intermediate|Advanced|Expert|Basic|Introductory)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("level pattern"))
    .collect()
});

/// First duration match in priority order, as raw text.
pub fn extract_duration(page_text: &str) -> Option<String> {
    if let Some(caps) = DURATION_PATTERNS[0].captures(page_text) {
        let value = caps[1].trim();
        if !value.is_empty() && value.chars().count() < MAX_DURATION_LENGTH {
            return Some(value.to_string());
        }
    }

    if let Some(caps) = COMBINED_DURATION.captures(page_text) {
        return Some(format!("{} hrs {} mins", &caps[1], &caps[2]));
    }

    for pattern in DURATION_PATTERNS[1..].iter() {
        if let Some(caps) = pattern.captures(page_text) {
            let value = caps[1].trim();
            if !value.is_empty() && value.chars().count() < MAX_DURATION_LENGTH {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// First level match: explicit labels, then bare difficulty words.
pub fn extract_level(page_text: &str) -> Option<String> {
    for pattern in LEVEL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(page_text) {
            let value = caps[1].trim();
            if !value.is_empty() && value.chars().count() < 50 {
                return Some(value.to_string());
            }
        }
    }
    None
}
