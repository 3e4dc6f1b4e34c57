use courselens_common::{CatalogError, Result};
use fantoccini::{Client, Locator};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Bounds for the post-navigation settle wait.
///
/// The page is considered settled once the readiness predicate holds: the
/// configured marker element exists, or (without a marker) the rendered
/// text has reached `min_text_length`. The predicate is polled at
/// `poll_interval` until `settle_timeout` passes; a timeout is not an
/// error — whatever rendered by then is returned.
#[derive(Debug, Clone)]
pub struct SettleOptions {
    /// Bounded wait for `document.readyState == "complete"`. Exceeding it
    /// is tolerated; the settle poll still runs.
    pub page_load_timeout: Duration,
    pub settle_timeout: Duration,
    pub poll_interval: Duration,
    /// CSS selector whose presence marks the page as settled.
    pub ready_marker: Option<String>,
    /// Fallback readiness signal when no marker is configured.
    pub min_text_length: usize,
}

impl Default for SettleOptions {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(10),
            settle_timeout: Duration::from_secs(12),
            poll_interval: Duration::from_millis(250),
            ready_marker: None,
            min_text_length: 500,
        }
    }
}

/// Page-level operations over the shared WebDriver session.
pub struct CatalogPage {
    client: Client,
}

impl CatalogPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate to `url`, wait for the document to settle, and return the
    /// realized page source.
    ///
    /// Navigation failures are [`CatalogError::Fetch`]; readiness timeouts
    /// are not. Cancelling the token aborts the wait with a `Fetch` error
    /// so the batch loop can stop at an item boundary.
    pub async fn fetch_rendered(
        &mut self,
        url: &str,
        opts: &SettleOptions,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.client
            .goto(url)
            .await
            .map_err(|e| CatalogError::Fetch(format!("navigation to {url} failed: {e}")))?;

        self.wait_for_load_state(opts, cancel).await?;
        self.wait_until_settled(opts, cancel).await?;

        self.client
            .source()
            .await
            .map_err(|e| CatalogError::Fetch(format!("page source unavailable: {e}")))
    }

    /// Poll `document.readyState` until "complete" or the bound passes.
    /// A timeout here only means client-side rendering is still going;
    /// the settle poll picks it up from there.
    async fn wait_for_load_state(
        &mut self,
        opts: &SettleOptions,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let deadline = Instant::now() + opts.page_load_timeout;
        loop {
            let state = self
                .client
                .execute("return document.readyState", vec![])
                .await
                .map_err(|e| CatalogError::Fetch(format!("readyState query failed: {e}")))?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!(target: "browser.page", "readyState never reached complete; continuing");
                return Ok(());
            }
            self.pause(opts.poll_interval, cancel).await?;
        }
    }

    /// Poll the content-readiness predicate until it holds or the settle
    /// bound passes. Replaces the fixed sleep the scraping scripts used.
    async fn wait_until_settled(
        &mut self,
        opts: &SettleOptions,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let started = Instant::now();
        let deadline = started + opts.settle_timeout;
        loop {
            if self.is_settled(opts).await? {
                debug!(
                    target: "browser.page",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "content settled"
                );
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!(
                    target: "browser.page",
                    timeout_secs = opts.settle_timeout.as_secs(),
                    "settle wait exhausted; extracting what rendered"
                );
                return Ok(());
            }
            self.pause(opts.poll_interval, cancel).await?;
        }
    }

    async fn is_settled(&mut self, opts: &SettleOptions) -> Result<bool> {
        if let Some(marker) = &opts.ready_marker {
            return Ok(self
                .client
                .find(Locator::Css(marker))
                .await
                .is_ok());
        }

        let length = self
            .client
            .execute(
                "return document.body ? document.body.innerText.length : 0",
                vec![],
            )
            .await
            .map_err(|e| CatalogError::Fetch(format!("content length query failed: {e}")))?;
        Ok(length.as_u64().unwrap_or(0) as usize >= opts.min_text_length)
    }

    async fn pause(&self, interval: Duration, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => {
                Err(CatalogError::Fetch("settle wait cancelled".into()))
            }
            _ = sleep(interval) => Ok(()),
        }
    }
}
