use crate::page::CatalogPage;
use courselens_common::{CatalogError, Result};
use fantoccini::ClientBuilder;
use serde_json::json;
use std::collections::HashMap;
use tracing::info;
use webdriver::capabilities::Capabilities;

/// Connection settings for the WebDriver session.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Chromedriver endpoint, e.g. `http://localhost:9515`.
    pub webdriver_url: String,
    pub headless: bool,
    /// `width,height`, passed straight to `--window-size`.
    pub window_size: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            window_size: "1920,1080".into(),
        }
    }
}

/// Chrome arguments for a scraping session. Sandbox and shared-memory
/// flags keep chromedriver usable inside containers.
fn chrome_args(settings: &BrowserSettings) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-extensions".to_string(),
        format!("--window-size={}", settings.window_size),
    ];
    if settings.headless {
        args.push("--headless".to_string());
    }
    args
}

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// The batch loop owns exactly one driver and runs one URL at a time
/// through it; there is no session pooling.
pub struct CatalogDriver {
    client: fantoccini::Client,
}

impl CatalogDriver {
    /// Connect to a running chromedriver service with capabilities built
    /// from `settings`.
    pub async fn connect(settings: &BrowserSettings) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(chrome_args(settings)));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&settings.webdriver_url)
            .await
            .map_err(|e| {
                CatalogError::Fetch(format!(
                    "webdriver connect to {} failed: {e}",
                    settings.webdriver_url
                ))
            })?;

        info!(
            target: "browser.driver",
            url = %settings.webdriver_url,
            headless = settings.headless,
            "webdriver session established"
        );

        Ok(Self { client })
    }

    /// Hand out a page wrapper over the shared session.
    pub fn page(&self) -> CatalogPage {
        CatalogPage::new(self.client.clone())
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| CatalogError::Fetch(format!("session close failed: {e}")))
    }
}
