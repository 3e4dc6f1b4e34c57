//! Batch input loading.
//!
//! Three shapes are accepted, picked by file extension: a plain-text file
//! with one title per line (URLs derived via slug generation), a CSV file
//! with `title,url` columns, or a JSON array of `{title, url}` objects.

use std::io::{Error, ErrorKind};
use std::path::Path;

use courselens_common::{CatalogError, Result};
use courselens_extract::slugify;
use serde::Deserialize;
use tracing::info;

/// One batch item: the source-of-truth title and the URL to fetch.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CourseInput {
    pub title: String,
    pub url: String,
}

/// Load batch inputs from `path`.
///
/// A missing or unreadable input file is fatal ([`CatalogError::Store`]) —
/// the batch cannot start without its work list.
pub fn load_inputs(path: &Path, url_base: &str, slug_prefixes: &[String]) -> Result<Vec<CourseInput>> {
    let inputs = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_pair_csv(path)?,
        Some("json") => load_pair_json(path)?,
        _ => load_title_list(path, url_base, slug_prefixes)?,
    };
    info!(
        target: "store.input",
        file = %path.display(),
        count = inputs.len(),
        "loaded batch inputs"
    );
    Ok(inputs)
}

/// One title per line; blank lines and `#` comments are skipped. The URL
/// is `url_base` plus the derived slug.
fn load_title_list(
    path: &Path,
    url_base: &str,
    slug_prefixes: &[String],
) -> Result<Vec<CourseInput>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|title| CourseInput {
            title: title.to_string(),
            url: format!("{url_base}{}", slugify(title, slug_prefixes)),
        })
        .collect())
}

fn load_pair_csv(path: &Path) -> Result<Vec<CourseInput>> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_to_store_error)?;
    let mut inputs = Vec::new();
    for row in reader.deserialize() {
        let input: CourseInput = row.map_err(csv_to_store_error)?;
        inputs.push(input);
    }
    Ok(inputs)
}

fn load_pair_json(path: &Path) -> Result<Vec<CourseInput>> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| CatalogError::Parse(format!("invalid input JSON: {e}")))
}

pub(crate) fn csv_to_store_error(e: csv::Error) -> CatalogError {
    CatalogError::Store(Error::new(ErrorKind::InvalidData, e))
}
