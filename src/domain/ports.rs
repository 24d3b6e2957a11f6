use crate::domain::model::{ProductId, ScrapeOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One isolated browsing context (a single tab).
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates and waits until the page has settled.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Markup of the currently loaded page.
    async fn content(&mut self) -> Result<String>;

    /// Releases the session. Calling it more than once is a no-op.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

pub trait ScraperConfig: Send + Sync {
    fn search_base_url(&self) -> &str;
    fn navigation_timeout(&self) -> Duration;
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn scrape(&self, product_id: &ProductId) -> ScrapeOutcome;
}
