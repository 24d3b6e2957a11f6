use crate::core::selectors::{product, search};
use crate::domain::model::ProductFields;
use scraper::{Html, Selector};

/// `href` of the first result card's anchor, or `None` when the search
/// returned nothing.
pub fn find_first_result_link(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);

    document
        .select(&search::RESULT_LINK)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

pub fn extract_product_fields(markup: &str) -> ProductFields {
    let document = Html::parse_document(markup);

    let fields = ProductFields {
        title: select_text(&document, &product::TITLE),
        old_price_raw: select_text(&document, &product::OLD_PRICE),
        new_price_raw: select_text(&document, &product::CURRENT_PRICE),
        image: select_attr(&document, &product::GALLERY_IMAGE, "src"),
    };

    tracing::debug!(
        "Extracted fields: title={}, old_price={}, new_price={}, image={}",
        fields.title.is_some(),
        fields.old_price_raw.is_some(),
        fields.new_price_raw.is_some(),
        fields.image.is_some()
    );

    fields
}

// Text of every match, concatenated and trimmed.
fn select_text(document: &Html, selector: &Selector) -> Option<String> {
    let text: String = document
        .select(selector)
        .flat_map(|element| element.text())
        .collect();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn select_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
