use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Browser error: {message}")]
    BrowserError { message: String },

    #[error("Navigation to {url} failed: {message}")]
    NavigationError { url: String, message: String },

    #[error("Navigation to {url} timed out after {seconds}s")]
    TimeoutError { url: String, seconds: u64 },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid request: {message}")]
    InvalidRequestError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Browser,
    Network,
    Configuration,
    Request,
    Internal,
}

impl ScrapeError {
    pub fn browser(message: impl std::fmt::Display) -> Self {
        Self::BrowserError {
            message: message.to_string(),
        }
    }

    pub fn navigation(url: &str, message: impl std::fmt::Display) -> Self {
        Self::NavigationError {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BrowserError { .. } => ErrorCategory::Browser,
            Self::NavigationError { .. } | Self::TimeoutError { .. } | Self::HttpError(_) => {
                ErrorCategory::Network
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::InvalidRequestError { .. } | Self::UrlError(_) => ErrorCategory::Request,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
