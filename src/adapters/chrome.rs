use crate::config::BrowserSettings;
use crate::core::{BrowserLauncher, BrowserSession};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A page counts as idle while at most this many requests are still open.
const MAX_IDLE_CONNECTIONS: usize = 2;

static PROFILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Launches a fresh headless Chrome process per session.
pub struct ChromeLauncher {
    settings: BrowserSettings,
}

impl ChromeLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn profile_dir() -> PathBuf {
        let n = PROFILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("product-scraper-{}-{}", std::process::id(), n))
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1366, 768)
            .user_data_dir(profile_dir)
            .request_timeout(Duration::from_secs(self.settings.navigation_timeout_secs))
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.settings.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        if let Some(user_agent) = &self.settings.user_agent {
            builder = builder.arg(format!("--user-agent={}", user_agent));
        }

        builder
            .build()
            .map_err(|e| ScrapeError::browser(format!("invalid browser config: {}", e)))
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.launch_in(Self::profile_dir()).await
    }
}

impl ChromeLauncher {
    async fn launch_in(&self, profile_dir: PathBuf) -> Result<Box<dyn BrowserSession>> {
        let config = self.browser_config(&profile_dir)?;

        let (browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(e) => {
                remove_profile_dir(&profile_dir).await;
                return Err(ScrapeError::browser(format!(
                    "failed to launch Chrome: {}",
                    e
                )));
            }
        };

        // The CDP connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("CDP handler error: {}", e);
                }
            }
        });

        let mut session = ChromeSession {
            browser: Some(browser),
            page: None,
            handler_task: Some(handler_task),
            profile_dir,
            idle_window: self.settings.idle_window(),
        };

        if let Err(e) = session.open_tab().await {
            let _ = session.close().await;
            return Err(e);
        }

        tracing::debug!("Chrome session started");
        Ok(Box::new(session))
    }
}

pub struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    profile_dir: PathBuf,
    idle_window: Duration,
}

impl ChromeSession {
    async fn open_tab(&mut self) -> Result<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ScrapeError::browser("browser session is closed"))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::browser(format!("failed to open tab: {}", e)))?;
        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapeError::browser("browser session is closed"))
    }

    /// Loads `url` and waits until no more than `MAX_IDLE_CONNECTIONS`
    /// requests have been open for `idle_window`. Bounded by the caller's
    /// navigation timeout.
    async fn goto_and_settle(&self, url: &str) -> Result<()> {
        let page = self.page()?;
        let nav_err = |e: CdpError| ScrapeError::navigation(url, e);

        // Subscribed before `goto` so requests fired during the load are seen.
        let mut sent = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(nav_err)?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(nav_err)?;
        let mut failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(nav_err)?;

        page.goto(url).await.map_err(nav_err)?;

        let mut in_flight = InFlightRequests::default();
        let idle = tokio::time::sleep(self.idle_window);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                Some(event) = sent.next() => {
                    in_flight.started(event.request_id.inner());
                }
                Some(event) = finished.next() => {
                    in_flight.settled(event.request_id.inner());
                }
                Some(event) = failed.next() => {
                    in_flight.settled(event.request_id.inner());
                }
                () = &mut idle, if in_flight.is_quiet() => {
                    tracing::debug!(
                        "Network idle on {} after {} requests",
                        url,
                        in_flight.seen()
                    );
                    return Ok(());
                }
                else => {
                    return Err(ScrapeError::navigation(url, "page event stream closed"));
                }
            }

            if in_flight.is_quiet() {
                idle.as_mut().reset(Instant::now() + self.idle_window);
            }
        }
    }
}

/// Requests the page has started but not yet finished or failed.
#[derive(Debug, Default)]
struct InFlightRequests {
    open: HashSet<String>,
    seen: usize,
}

impl InFlightRequests {
    fn started(&mut self, request_id: &str) {
        // Redirects reuse the request id.
        if self.open.insert(request_id.to_string()) {
            self.seen += 1;
        }
    }

    fn settled(&mut self, request_id: &str) {
        self.open.remove(request_id);
    }

    fn is_quiet(&self) -> bool {
        self.open.len() <= MAX_IDLE_CONNECTIONS
    }

    fn seen(&self) -> usize {
        self.seen
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.goto_and_settle(url).await
    }

    async fn content(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| ScrapeError::browser(format!("failed to read page content: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        let mut result = Ok(());

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close tab: {}", e);
            }
        }

        if let Some(mut browser) = self.browser.take() {
            match browser.close().await {
                Ok(_) => {
                    if let Err(e) = browser.wait().await {
                        result = Err(ScrapeError::IoError(e));
                    }
                }
                Err(e) => {
                    result = Err(ScrapeError::browser(format!("failed to close Chrome: {}", e)));
                }
            }
        }

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        remove_profile_dir(&self.profile_dir).await;

        result
    }
}

async fn remove_profile_dir(profile_dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(profile_dir).await {
        tracing::debug!(
            "Failed to remove profile dir {}: {}",
            profile_dir.display(),
            e
        );
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}
