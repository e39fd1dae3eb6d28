use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use super::Product;

/// One entry of `GET /users/me/favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub product_id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub product: Product,
}

/// Response of `GET /products/{id}/favorite`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoriteStatus {
    #[serde(default)]
    pub is_favorite: bool,
}
