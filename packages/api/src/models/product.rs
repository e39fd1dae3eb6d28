use serde::{Deserialize, Serialize};

/// A catalog entry as listed by `GET /products/` and `GET /products/{id}`.
///
/// `average_rating` and `review_count` are derived server-side and change
/// whenever a review is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub category_id: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub specs: Option<serde_json::Value>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

fn default_currency() -> String {
    "TRY".to_string()
}

impl Product {
    /// "Brand Model", the label every list shows.
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}
