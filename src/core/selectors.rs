//! CSS selectors for the catalog's search and product pages.
//!
//! The catalog markup is load-bearing: when the site changes its class
//! names, extraction silently degrades to missing fields. Update the
//! selectors here together with the fixtures under `tests/fixtures/`.

use scraper::Selector;
use std::sync::LazyLock;

/// Search results page.
pub mod search {
    use super::*;

    /// Anchor inside a result card; the first one is the best match.
    pub static RESULT_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".product-card__content a").unwrap());
}

/// Product detail page.
pub mod product {
    use super::*;

    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".p-view__header-title").unwrap());

    /// Only present on discounted items.
    pub static OLD_PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".p-trade-price__old > .sum").unwrap());

    pub static CURRENT_PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".p-trade-price__current > .sum").unwrap());

    pub static GALLERY_IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".main-gallery__link img").unwrap());
}
