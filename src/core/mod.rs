pub mod batch;
pub mod extract;
pub mod normalize;
pub mod product_scraper;
pub mod selectors;

pub use crate::domain::model::{ProductFields, ProductId, ProductResult, ScrapeOutcome, SkipReason};
pub use crate::domain::ports::{BrowserLauncher, BrowserSession, ProductSource, ScraperConfig};
pub use crate::utils::error::Result;
