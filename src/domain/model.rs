use crate::utils::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque product identifier, used verbatim as the catalog search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Strings pass through untouched and numbers are written the way a JS
/// template literal would (`1e3` and `1000.0` both give `"1000"`); any other
/// JSON type is not an identifier.
impl TryFrom<&serde_json::Value> for ProductId {
    type Error = ScrapeError;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(Self::new(s.as_str())),
            serde_json::Value::Number(n) => Ok(Self::new(number_text(n))),
            other => Err(ScrapeError::InvalidRequestError {
                message: format!(
                    "productIds must contain only strings or numbers, got {}",
                    other
                ),
            }),
        }
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        // f64's Display drops a zero fraction: 1000.0 prints as "1000".
        f.to_string()
    } else {
        n.to_string()
    }
}

/// Raw values pulled from a product page, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub title: Option<String>,
    pub old_price_raw: Option<String>,
    pub new_price_raw: Option<String>,
    pub image: Option<String>,
}

/// Scraped product record. Optional fields are either absent or non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResult {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ProductResult {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            title: None,
            old_price: None,
            new_price: None,
            image: None,
            product_url: None,
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = non_empty(title);
        self
    }

    pub fn with_old_price(mut self, price: String) -> Self {
        self.old_price = non_empty(price);
        self
    }

    pub fn with_new_price(mut self, price: String) -> Self {
        self.new_price = non_empty(price);
        self
    }

    pub fn with_image(mut self, image: String) -> Self {
        self.image = non_empty(image);
        self
    }

    pub fn with_product_url(mut self, url: String) -> Self {
        self.product_url = non_empty(url);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The search page had no result entries.
    NotFound,
    /// Launch, navigation or content retrieval failed.
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => f.write_str("no search result"),
            SkipReason::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Result of scraping a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Found(ProductResult),
    Skipped(SkipReason),
}

impl ScrapeOutcome {
    pub fn into_result(self) -> Option<ProductResult> {
        match self {
            ScrapeOutcome::Found(result) => Some(result),
            ScrapeOutcome::Skipped(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_id_from_json() {
        assert_eq!(
            ProductId::try_from(&json!("A-123")).unwrap().as_str(),
            "A-123"
        );
        assert_eq!(ProductId::try_from(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(ProductId::try_from(&json!(-7)).unwrap().as_str(), "-7");
        assert!(ProductId::try_from(&json!(null)).is_err());
        assert!(ProductId::try_from(&json!(true)).is_err());
        assert!(ProductId::try_from(&json!({"id": 1})).is_err());
    }

    #[test]
    fn test_float_product_ids_drop_zero_fraction() {
        let body: serde_json::Value =
            serde_json::from_str(r#"[1e3, 1.0, 2.5, 18446744073709551615]"#).unwrap();
        let ids: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| ProductId::try_from(v).unwrap().to_string())
            .collect();

        assert_eq!(ids, vec!["1000", "1", "2.5", "18446744073709551615"]);
    }

    #[test]
    fn test_result_omits_empty_fields() {
        let result = ProductResult::new(ProductId::from("777"))
            .with_title("Phone".to_string())
            .with_old_price(String::new())
            .with_new_price("1 299 ₴".to_string())
            .with_image(String::new());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"productId": "777", "title": "Phone", "newPrice": "1 299 ₴"})
        );
    }

    #[test]
    fn test_result_with_only_id() {
        let value = serde_json::to_value(ProductResult::new(ProductId::from("1"))).unwrap();
        assert_eq!(value, json!({"productId": "1"}));
    }
}
