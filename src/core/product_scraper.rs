use crate::core::extract;
use crate::core::normalize::{normalize_price, normalize_title};
use crate::domain::model::{ProductFields, ProductId, ProductResult, ScrapeOutcome, SkipReason};
use crate::domain::ports::{BrowserLauncher, BrowserSession, ProductSource, ScraperConfig};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use url::Url;

pub const SEARCH_PATH: &str = "/ua/catalogsearch/result/";

/// Scrapes one product per browser session: search, follow the first
/// result, extract, normalize.
pub struct ProductScraper<L: BrowserLauncher, C: ScraperConfig> {
    launcher: L,
    config: C,
}

impl<L: BrowserLauncher, C: ScraperConfig> ProductScraper<L, C> {
    pub fn new(launcher: L, config: C) -> Self {
        Self { launcher, config }
    }

    pub fn search_url(&self, product_id: &ProductId) -> Result<Url> {
        let mut url = Url::parse(self.config.search_base_url())?.join(SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("q", product_id.as_str());
        Ok(url)
    }

    pub async fn scrape_product(&self, product_id: &ProductId) -> ScrapeOutcome {
        let mut session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Failed to process product {}: {}", product_id, e);
                return ScrapeOutcome::Skipped(SkipReason::Failed(e.to_string()));
            }
        };

        let outcome = self.scrape_in_session(session.as_mut(), product_id).await;

        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close browser session for {}: {}", product_id, e);
        }

        match outcome {
            Ok(Some(result)) => {
                tracing::debug!("Scraped product {}: {:?}", product_id, result);
                ScrapeOutcome::Found(result)
            }
            Ok(None) => {
                tracing::warn!("Product with ID {} not found", product_id);
                ScrapeOutcome::Skipped(SkipReason::NotFound)
            }
            Err(e) => {
                tracing::error!("Failed to process product {}: {}", product_id, e);
                ScrapeOutcome::Skipped(SkipReason::Failed(e.to_string()))
            }
        }
    }

    async fn scrape_in_session(
        &self,
        session: &mut dyn BrowserSession,
        product_id: &ProductId,
    ) -> Result<Option<ProductResult>> {
        let search_url = self.search_url(product_id)?;
        let search_page = self.load(session, &search_url).await?;

        let Some(link) = extract::find_first_result_link(&search_page) else {
            return Ok(None);
        };
        let product_url = search_url.join(&link)?;
        tracing::debug!("First result for {}: {}", product_id, product_url);

        let product_page = self.load(session, &product_url).await?;
        let fields = extract::extract_product_fields(&product_page);

        Ok(Some(assemble_result(
            product_id.clone(),
            fields,
            product_url.as_str(),
        )))
    }

    async fn load(&self, session: &mut dyn BrowserSession, url: &Url) -> Result<String> {
        let limit = self.config.navigation_timeout();

        tokio::time::timeout(limit, session.navigate(url.as_str()))
            .await
            .map_err(|_| ScrapeError::TimeoutError {
                url: url.to_string(),
                seconds: limit.as_secs(),
            })??;

        session.content().await
    }
}

#[async_trait]
impl<L: BrowserLauncher, C: ScraperConfig> ProductSource for ProductScraper<L, C> {
    async fn scrape(&self, product_id: &ProductId) -> ScrapeOutcome {
        self.scrape_product(product_id).await
    }
}

pub fn assemble_result(
    product_id: ProductId,
    fields: ProductFields,
    product_url: &str,
) -> ProductResult {
    let title = fields
        .title
        .map(|t| normalize_title(t.trim()))
        .unwrap_or_default();
    let old_price = fields
        .old_price_raw
        .map(|p| normalize_price(&p))
        .unwrap_or_default();
    let new_price = fields
        .new_price_raw
        .map(|p| normalize_price(&p))
        .unwrap_or_default();

    ProductResult::new(product_id)
        .with_title(title)
        .with_old_price(old_price)
        .with_new_price(new_price)
        .with_image(fields.image.unwrap_or_default())
        .with_product_url(product_url.to_string())
}
