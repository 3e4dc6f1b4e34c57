//! Wires configuration, browser, extraction, and storage into one run.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use courselens_browser::{BrowserSettings, CatalogDriver, CatalogPage, SettleOptions};
use courselens_common::CourseRecord;
use courselens_config::{CatalogConfig, ContentTypeConfig};
use courselens_extract::{ExtractionRules, SelectorLists};
use courselens_store::{build_combined, load_inputs, write_combined, FsSnapshotStore};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::batch::{run_batch, BatchOptions, PageFetcher};

/// [`PageFetcher`] backed by the live WebDriver session.
struct DriverFetcher {
    page: CatalogPage,
    settle: SettleOptions,
}

#[async_trait]
impl PageFetcher for DriverFetcher {
    async fn fetch_rendered(
        &mut self,
        url: &str,
        cancel: &CancellationToken,
    ) -> courselens_common::Result<String> {
        self.page.fetch_rendered(url, &self.settle, cancel).await
    }
}

fn settle_options(cfg: &CatalogConfig, ct: &ContentTypeConfig) -> SettleOptions {
    SettleOptions {
        page_load_timeout: Duration::from_secs(cfg.settings.page_load_timeout_secs),
        settle_timeout: Duration::from_secs(cfg.settings.settle_timeout_secs),
        poll_interval: Duration::from_millis(cfg.settings.poll_interval_ms),
        ready_marker: ct.ready_marker.clone(),
        ..SettleOptions::default()
    }
}

fn compile_rules(cfg: &CatalogConfig, ct: &ContentTypeConfig) -> ExtractionRules {
    ExtractionRules::compile(
        SelectorLists {
            title: &ct.selectors.title,
            description: &ct.selectors.description,
            objectives: &ct.selectors.objectives,
            outline: &ct.selectors.outline,
            prerequisites: &ct.selectors.prerequisites,
        },
        &cfg.boilerplate_phrases,
        cfg.audience_vocabulary
            .iter()
            .map(|e| (e.phrase.clone(), e.label.clone())),
        ct.min_description_length,
    )
}

/// Run every selected content type through the batch loop, then write the
/// combined dataset when more than one type produced records.
///
/// The browser session is closed on every exit path, including input-load
/// and snapshot-write failures mid-run.
pub async fn execute(
    cfg: CatalogConfig,
    only_types: &[String],
    cancel: CancellationToken,
) -> Result<()> {
    for name in only_types {
        if !cfg.content_types.contains_key(name) {
            bail!("unknown content type '{name}'");
        }
    }

    let driver = CatalogDriver::connect(&BrowserSettings {
        webdriver_url: cfg.settings.webdriver_url.clone(),
        headless: cfg.settings.headless,
        window_size: cfg.settings.window_size.clone(),
    })
    .await
    .context("webdriver session could not be established")?;

    let outcome = run_content_types(&cfg, only_types, &driver, &cancel).await;
    let closed = driver
        .close()
        .await
        .context("browser session close failed");

    outcome?;
    closed
}

async fn run_content_types(
    cfg: &CatalogConfig,
    only_types: &[String],
    driver: &CatalogDriver,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut all_records: Vec<CourseRecord> = Vec::new();
    let mut types_run = 0usize;

    for (name, ct) in &cfg.content_types {
        if !only_types.is_empty() && !only_types.contains(name) {
            continue;
        }
        if cancel.is_cancelled() {
            break;
        }

        let inputs = load_inputs(&ct.input_file, &ct.url_base, &cfg.slug_prefixes)
            .with_context(|| format!("could not load inputs for '{name}'"))?;
        info!(target: "app.run", content_type = %name, items = inputs.len(), "starting content type");

        let rules = compile_rules(cfg, ct);
        let store = FsSnapshotStore::new(&ct.output.json, &ct.output.csv);
        let mut fetcher = DriverFetcher {
            page: driver.page(),
            settle: settle_options(cfg, ct),
        };
        let opts = BatchOptions {
            content_type: name.clone(),
            display_name: ct.display_name.clone(),
            checkpoint_interval: cfg.settings.checkpoint_interval,
            item_delay: Duration::from_secs(cfg.settings.item_delay_secs),
        };

        let snapshot = run_batch(&mut fetcher, &rules, &inputs, &opts, &store, cancel)
            .await
            .with_context(|| format!("batch for '{name}' failed"))?;

        all_records.extend(snapshot.items);
        types_run += 1;
    }

    if types_run > 1 {
        if let Some(out) = &cfg.combined_output {
            let dataset = build_combined("course-catalog", all_records);
            write_combined(&dataset, &out.json, &out.csv)
                .context("combined dataset could not be written")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use courselens_config::CatalogConfigLoader;

    #[tokio::test]
    async fn unknown_content_type_is_rejected_before_connecting() {
        let cfg = CatalogConfigLoader::new()
            .with_json_str(
                r#"{
                "content_types": {
                    "e-learning": {
                        "display_name": "E-Learning",
                        "input_file": "courses.txt",
                        "url_base": "https://learning.example.com/courses/",
                        "output": { "json": "o.json", "csv": "o.csv" }
                    }
                }
            }"#,
            )
            .load()
            .unwrap();

        let err = execute(cfg, &["webinar".to_string()], CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown content type"));
    }
}
