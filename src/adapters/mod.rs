// Adapters layer: concrete browser backends behind the BrowserLauncher port.

pub mod chrome;
pub mod http;

use crate::config::{Backend, BrowserSettings};
use crate::core::{BrowserLauncher, BrowserSession};
use crate::utils::error::Result;
use async_trait::async_trait;

pub use chrome::ChromeLauncher;
pub use http::HttpLauncher;

/// Backend picked from configuration at start-up.
pub enum AnyLauncher {
    Chrome(ChromeLauncher),
    Http(HttpLauncher),
}

impl AnyLauncher {
    pub fn from_settings(settings: &BrowserSettings) -> Result<Self> {
        tracing::info!("Using {:?} browser backend", settings.backend);
        match settings.backend {
            Backend::Chrome => Ok(Self::Chrome(ChromeLauncher::new(settings.clone()))),
            Backend::Http => Ok(Self::Http(HttpLauncher::new(settings)?)),
        }
    }
}

#[async_trait]
impl BrowserLauncher for AnyLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        match self {
            Self::Chrome(launcher) => launcher.launch().await,
            Self::Http(launcher) => launcher.launch().await,
        }
    }
}
