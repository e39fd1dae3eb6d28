use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A published review as listed under a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub author_alias: String,
}

/// Body of `POST /products/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    pub rating: u8,
    pub text: String,
    /// Handle for anonymous submissions; ignored when a token is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl NewReview {
    pub fn new(rating: u8, text: impl Into<String>) -> Self {
        Self {
            rating,
            text: text.into(),
            username: None,
        }
    }
}

/// Acknowledgement of an accepted review; `detail` echoes the stored review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewSubmitted {
    pub message: String,
    #[serde(default)]
    pub detail: Option<Review>,
}
