pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::AnyLauncher;
pub use config::{AppConfig, Cli, Command};
pub use core::{batch::BatchRunner, product_scraper::ProductScraper};
pub use domain::model::{ProductId, ProductResult, ScrapeOutcome, SkipReason};
pub use utils::error::{Result, ScrapeError};
