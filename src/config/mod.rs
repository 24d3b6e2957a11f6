pub mod cli;
pub mod toml_config;

use crate::core::ScraperConfig;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use cli::{Cli, Command};

pub const DEFAULT_BASE_URL: &str = "https://allo.ua";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Headless Chrome over the DevTools protocol
    #[default]
    Chrome,
    /// Plain HTTP fetches, no script execution
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub base_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub backend: Backend,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub navigation_timeout_secs: u64,
    /// How long the network must stay quiet before a page counts as loaded.
    pub idle_window_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Chrome,
            headless: true,
            chrome_executable: None,
            navigation_timeout_secs: 30,
            idle_window_ms: 500,
            user_agent: None,
        }
    }
}

impl BrowserSettings {
    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }
}

/// Process-wide configuration, resolved once at start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub site: SiteSettings,
    pub browser: BrowserSettings,
}

impl AppConfig {
    /// Loads the file named by `--config` (if any) and applies command-line
    /// overrides on top of it.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        if let Some(backend) = cli.backend {
            config.browser.backend = backend;
        }
        if cli.headed {
            config.browser.headless = false;
        }
        if let Some(base_url) = &cli.base_url {
            config.site.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.browser.navigation_timeout_secs = timeout;
        }
        if let Command::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        Ok(config)
    }
}

impl ScraperConfig for AppConfig {
    fn search_base_url(&self) -> &str {
        &self.site.base_url
    }

    fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.browser.navigation_timeout_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_url("site.base_url", &self.site.base_url)?;
        validate_positive_number(
            "browser.navigation_timeout_secs",
            self.browser.navigation_timeout_secs,
            1,
        )?;
        validate_range("browser.idle_window_ms", self.browser.idle_window_ms, 0, 10_000)?;
        Ok(())
    }
}
