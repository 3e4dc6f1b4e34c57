//! Common types and utilities shared across courselens crates.
//!
//! This crate defines the course record model, the error taxonomy, and the
//! observability helpers used throughout the workspace. It is intentionally
//! lightweight so every member crate can depend on it without pulling in
//! browser or storage machinery.
//!
//! # Overview
//!
//! - [`CourseRecord`]: one extracted catalog item
//! - [`RunSnapshot`]: a full snapshot of an extraction run, used for both
//!   periodic checkpoints and final output
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`CatalogError`] and [`Result`]: shared error handling
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub mod observability;

/// A single extracted catalog item.
///
/// `title` is the source-of-truth input and is never overwritten by page
/// content; anything the page claims its own title to be lands in
/// `extracted_title`. Optional fields hold the first successful match from
/// their rule list, or nothing. Records are immutable once built —
/// re-running extraction replaces a record, it never patches one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecord {
    pub title: String,
    pub url: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub course_outline: Vec<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
    /// RFC 3339, set once at extraction time.
    pub extraction_timestamp: String,
    #[serde(default)]
    pub page_length: usize,
    /// Per-item failure note. A failed fetch still produces a record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CourseRecord {
    /// An empty record for `title`/`url`, timestamped now.
    pub fn new(title: impl Into<String>, url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content_type: content_type.into(),
            extracted_title: None,
            description: None,
            duration: None,
            level: None,
            prerequisites: None,
            objectives: Vec::new(),
            course_outline: Vec::new(),
            target_audience: Vec::new(),
            extraction_timestamp: Utc::now().to_rfc3339(),
            page_length: 0,
            error: None,
        }
    }

    /// Record for an item whose fetch or extraction failed. Fields stay
    /// empty; the note is preserved so the batch can keep going.
    pub fn failed(
        title: impl Into<String>,
        url: impl Into<String>,
        content_type: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        let mut record = Self::new(title, url, content_type);
        record.error = Some(note.into());
        record
    }

    /// Whether extraction produced anything beyond the input fields.
    pub fn has_content(&self) -> bool {
        self.description.is_some()
            || self.duration.is_some()
            || self.level.is_some()
            || self.prerequisites.is_some()
            || !self.objectives.is_empty()
            || !self.course_outline.is_empty()
            || !self.target_audience.is_empty()
    }
}

/// Metadata attached to every snapshot write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunInfo {
    pub content_type: String,
    pub display_name: String,
    pub extraction_date: String,
    pub total_items: usize,
    pub successful_extractions: usize,
}

/// A full snapshot of an extraction run: metadata plus every record
/// processed so far. Checkpoints rewrite the whole snapshot, never append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSnapshot {
    pub run_info: RunInfo,
    pub items: Vec<CourseRecord>,
}

impl RunSnapshot {
    pub fn new(content_type: &str, display_name: &str, items: Vec<CourseRecord>) -> Self {
        let successful = items.iter().filter(|r| r.has_content()).count();
        Self {
            run_info: RunInfo {
                content_type: content_type.to_string(),
                display_name: display_name.to_string(),
                extraction_date: Utc::now().to_rfc3339(),
                total_items: items.len(),
                successful_extractions: successful,
            },
            items,
        }
    }
}

/// Error types used across the courselens system.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Navigation, WebDriver connect, or readiness-timeout failure.
    /// Recorded per item; never aborts a batch on its own.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Malformed markup or an uncompilable selector. Tolerated by
    /// returning empty fields.
    #[error("parse error: {0}")]
    Parse(String),

    /// Input or output file could not be read/written. Fatal when it hits
    /// the input list at startup or the output destinations.
    #[error("store error: {0}")]
    Store(#[from] std::io::Error),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_record_keeps_note_and_stays_empty() {
        let r = CourseRecord::failed("T", "https://x/t", "e-learning", "timeout");
        assert_eq!(r.error.as_deref(), Some("timeout"));
        assert!(!r.has_content());
        assert!(!r.extraction_timestamp.is_empty());
    }

    #[test]
    fn snapshot_counts_records_with_content() {
        let mut a = CourseRecord::new("A", "u", "e-learning");
        a.description = Some("something".into());
        let b = CourseRecord::new("B", "u", "e-learning");
        let snap = RunSnapshot::new("e-learning", "E-Learning", vec![a, b]);
        assert_eq!(snap.run_info.total_items, 2);
        assert_eq!(snap.run_info.successful_extractions, 1);
    }
}
