use crate::core::ProductSource;
use crate::domain::model::{ProductId, ProductResult, ScrapeOutcome};

/// Runs a batch of product IDs one at a time, keeping the successes in
/// input order.
pub struct BatchRunner<S: ProductSource> {
    source: S,
}

impl<S: ProductSource> BatchRunner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn run(&self, product_ids: &[ProductId]) -> Vec<ProductResult> {
        let total = product_ids.len();
        let mut results = Vec::with_capacity(total);
        let mut skipped = 0usize;

        for (index, product_id) in product_ids.iter().enumerate() {
            tracing::info!("Processing product {} ({}/{})", product_id, index + 1, total);

            match self.source.scrape(product_id).await {
                ScrapeOutcome::Found(result) => results.push(result),
                ScrapeOutcome::Skipped(reason) => {
                    tracing::debug!("Skipping product {}: {}", product_id, reason);
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            "Batch finished: {} found, {} skipped of {}",
            results.len(),
            skipped,
            total
        );
        results
    }
}
