//! Snapshot persistence.
//!
//! The batch loop talks to a [`SnapshotStore`] and never to the disk
//! directly, so checkpoint behaviour can be unit tested against the
//! in-memory implementation.

use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use courselens_common::{CatalogError, CourseRecord, Result, RunSnapshot};
use tracing::info;

use crate::input::csv_to_store_error;

/// Destination for run snapshots. Every write replaces the previous
/// snapshot wholesale; a checkpoint and a final write are the same
/// operation.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn write_snapshot(&self, snapshot: &RunSnapshot) -> Result<()>;

    /// The most recently written snapshot, if any.
    async fn read_last_snapshot(&self) -> Result<Option<RunSnapshot>>;
}

/// Filesystem store writing a JSON document and a flat CSV side by side.
pub struct FsSnapshotStore {
    json_path: PathBuf,
    csv_path: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(json_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            csv_path: csv_path.into(),
        }
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn write_snapshot(&self, snapshot: &RunSnapshot) -> Result<()> {
        if let Some(parent) = self.json_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| CatalogError::Store(Error::new(ErrorKind::InvalidData, e)))?;
        std::fs::write(&self.json_path, json)?;

        write_records_csv(&self.csv_path, &snapshot.items)?;

        info!(
            target: "store.snapshot",
            json = %self.json_path.display(),
            items = snapshot.items.len(),
            successful = snapshot.run_info.successful_extractions,
            "snapshot written"
        );
        Ok(())
    }

    async fn read_last_snapshot(&self) -> Result<Option<RunSnapshot>> {
        if !self.json_path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.json_path)?;
        let snapshot = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::Parse(format!("invalid snapshot JSON: {e}")))?;
        Ok(Some(snapshot))
    }
}

/// List fields are joined with `"; "` to keep one row per course.
pub(crate) fn write_records_csv(path: &Path, records: &[CourseRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(csv_to_store_error)?;
    writer
        .write_record([
            "title",
            "url",
            "content_type",
            "extracted_title",
            "description",
            "duration",
            "level",
            "prerequisites",
            "objectives",
            "course_outline",
            "target_audience",
            "extraction_timestamp",
            "page_length",
            "error",
        ])
        .map_err(csv_to_store_error)?;

    for r in records {
        writer
            .write_record([
                r.title.as_str(),
                r.url.as_str(),
                r.content_type.as_str(),
                r.extracted_title.as_deref().unwrap_or(""),
                r.description.as_deref().unwrap_or(""),
                r.duration.as_deref().unwrap_or(""),
                r.level.as_deref().unwrap_or(""),
                r.prerequisites.as_deref().unwrap_or(""),
                &r.objectives.join("; "),
                &r.course_outline.join("; "),
                &r.target_audience.join("; "),
                r.extraction_timestamp.as_str(),
                &r.page_length.to_string(),
                r.error.as_deref().unwrap_or(""),
            ])
            .map_err(csv_to_store_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// In-memory store keeping every snapshot it was handed, in order.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<Vec<RunSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every snapshot written so far, oldest first.
    pub fn snapshots(&self) -> Vec<RunSnapshot> {
        self.snapshots
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn write_snapshot(&self, snapshot: &RunSnapshot) -> Result<()> {
        self.snapshots
            .lock()
            .map_err(|_| CatalogError::Store(Error::new(ErrorKind::Other, "store poisoned")))?
            .push(snapshot.clone());
        Ok(())
    }

    async fn read_last_snapshot(&self) -> Result<Option<RunSnapshot>> {
        Ok(self.snapshots().into_iter().last())
    }
}
