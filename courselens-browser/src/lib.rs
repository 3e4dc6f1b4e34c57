//! Browser layer for fetching JavaScript-rendered catalog pages.
//!
//! - [`driver::CatalogDriver`]: WebDriver client wrapper (chromedriver)
//! - [`page::CatalogPage`]: navigation plus the bounded, cancellable
//!   settle wait that replaces the fixed "sleep N seconds for rendering"
//!   strategy with a polled readiness predicate
pub mod driver;
pub mod page;

pub use driver::{BrowserSettings, CatalogDriver};
pub use page::{CatalogPage, SettleOptions};
