//! Merged output across content types.
//!
//! After every content type in a run has produced its own snapshot, the
//! records are merged into one dataset with per-type counts so downstream
//! consumers get a single file to load.

use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::path::Path;

use chrono::Utc;
use courselens_common::{CatalogError, CourseRecord, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::snapshot::write_records_csv;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetInfo {
    pub name: String,
    /// RFC 3339, set when the dataset is built.
    pub creation_date: String,
    pub total_items: usize,
    pub content_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetStatistics {
    pub by_content_type: BTreeMap<String, usize>,
    pub with_target_audience: usize,
    pub with_descriptions: usize,
}

/// All records from a run merged into one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedDataset {
    pub dataset_info: DatasetInfo,
    pub statistics: DatasetStatistics,
    pub items: Vec<CourseRecord>,
}

/// Merge `items` into a combined dataset named `name`. Record order is
/// preserved; statistics are derived, never supplied.
pub fn build_combined(name: &str, items: Vec<CourseRecord>) -> CombinedDataset {
    let mut by_content_type = BTreeMap::new();
    for r in &items {
        *by_content_type.entry(r.content_type.clone()).or_insert(0) += 1;
    }
    let content_types = by_content_type.keys().cloned().collect();

    CombinedDataset {
        dataset_info: DatasetInfo {
            name: name.to_string(),
            creation_date: Utc::now().to_rfc3339(),
            total_items: items.len(),
            content_types,
        },
        statistics: DatasetStatistics {
            by_content_type,
            with_target_audience: items.iter().filter(|r| !r.target_audience.is_empty()).count(),
            with_descriptions: items.iter().filter(|r| r.description.is_some()).count(),
        },
        items,
    }
}

/// Write the combined dataset as JSON plus a flat CSV of its items.
pub fn write_combined(dataset: &CombinedDataset, json_path: &Path, csv_path: &Path) -> Result<()> {
    if let Some(parent) = json_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(dataset)
        .map_err(|e| CatalogError::Store(Error::new(ErrorKind::InvalidData, e)))?;
    std::fs::write(json_path, json)?;
    write_records_csv(csv_path, &dataset.items)?;

    info!(
        target: "store.combined",
        json = %json_path.display(),
        items = dataset.items.len(),
        "combined dataset written"
    );
    Ok(())
}
