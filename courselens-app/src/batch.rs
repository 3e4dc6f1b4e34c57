//! Sequential batch loop over one content type's inputs.
//!
//! The loop drives a [`PageFetcher`] one URL at a time, turns each page
//! into a record, and rewrites the full snapshot at a fixed interval and
//! once more at the end. Per-item failures become failed records; only a
//! snapshot write failure aborts the batch.

use std::time::Duration;

use async_trait::async_trait;
use courselens_common::{CourseRecord, Result, RunSnapshot};
use courselens_extract::{extract_course, ExtractionRules};
use courselens_store::{CourseInput, SnapshotStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Source of rendered page markup. The production implementation drives a
/// WebDriver session; tests substitute canned pages.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_rendered(&mut self, url: &str, cancel: &CancellationToken) -> Result<String>;
}

pub struct BatchOptions {
    pub content_type: String,
    pub display_name: String,
    /// Full snapshot is rewritten every this many items.
    pub checkpoint_interval: usize,
    /// Pause between items, to rate-limit against the target site.
    pub item_delay: Duration,
}

/// Run every input through fetch and extraction, checkpointing along the
/// way. Returns the final snapshot, which has also been written to `store`.
///
/// Cancellation stops the loop at an item boundary; records gathered up to
/// that point still get their final snapshot.
pub async fn run_batch<F: PageFetcher, S: SnapshotStore + ?Sized>(
    fetcher: &mut F,
    rules: &ExtractionRules,
    inputs: &[CourseInput],
    opts: &BatchOptions,
    store: &S,
    cancel: &CancellationToken,
) -> Result<RunSnapshot> {
    let mut records: Vec<CourseRecord> = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(
                target: "app.batch",
                processed = records.len(),
                remaining = inputs.len() - records.len(),
                "cancellation requested; stopping at item boundary"
            );
            break;
        }

        info!(
            target: "app.batch",
            item = index + 1,
            total = inputs.len(),
            title = %input.title,
            url = %input.url,
            "processing"
        );

        match fetcher.fetch_rendered(&input.url, cancel).await {
            Ok(html) => {
                records.push(extract_course(
                    rules,
                    &input.title,
                    &input.url,
                    &opts.content_type,
                    &html,
                ));
            }
            Err(e) if cancel.is_cancelled() => {
                warn!(target: "app.batch", title = %input.title, error = %e, "fetch aborted by cancellation");
                break;
            }
            Err(e) => {
                warn!(target: "app.batch", title = %input.title, error = %e, "fetch failed");
                records.push(CourseRecord::failed(
                    &input.title,
                    &input.url,
                    &opts.content_type,
                    e.to_string(),
                ));
            }
        }

        if (index + 1) % opts.checkpoint_interval == 0 {
            let checkpoint =
                RunSnapshot::new(&opts.content_type, &opts.display_name, records.clone());
            store.write_snapshot(&checkpoint).await?;
            info!(target: "app.batch", items = records.len(), "checkpoint written");
        }

        if index + 1 < inputs.len() {
            pause(opts.item_delay, cancel).await;
        }
    }

    let snapshot = RunSnapshot::new(&opts.content_type, &opts.display_name, records);
    store.write_snapshot(&snapshot).await?;
    info!(
        target: "app.batch",
        content_type = %opts.content_type,
        total = snapshot.run_info.total_items,
        successful = snapshot.run_info.successful_extractions,
        "batch finished"
    );
    Ok(snapshot)
}

async fn pause(delay: Duration, cancel: &CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(delay) => {}
    }
}
