use crate::config::BrowserSettings;
use crate::core::{BrowserLauncher, BrowserSession};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches markup over plain HTTP. Scripts never run, so only
/// server-rendered content is visible.
pub struct HttpLauncher {
    client: Client,
}

impl HttpLauncher {
    pub fn new(settings: &BrowserSettings) -> Result<Self> {
        let user_agent = settings
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.navigation_timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            page: None,
        }))
    }
}

pub struct HttpSession {
    client: Client,
    page: Option<String>,
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        tracing::debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;

        // Like a browser, an error status still leaves a page to read.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} responded with {}", url, status);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;
        self.page = Some(body);
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.page
            .clone()
            .ok_or_else(|| ScrapeError::browser("no page loaded"))
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        Ok(())
    }
}
