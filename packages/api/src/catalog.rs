//! Product catalog: listing with filters, detail, brands, categories.

use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{Category, Product};
use crate::transport::{ApiRequest, Transport};

/// Largest page the backend serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Server-side sort orders for `GET /products/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::RatingDesc => "rating_desc",
        }
    }
}

/// Filters for the product list. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub brand: Option<String>,
    pub category_id: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<SortOrder>,
    pub min_rating: Option<f64>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort_by = Some(order);
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    /// Append the query string; blank text filters are dropped and numeric
    /// bounds clamped to what the backend accepts.
    pub fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(skip) = self.skip {
            request = request.query("skip", skip);
        }
        if let Some(limit) = self.limit {
            request = request.query("limit", limit.clamp(1, MAX_PAGE_SIZE));
        }
        for (key, value) in [
            ("brand", &self.brand),
            ("category_id", &self.category_id),
            ("search", &self.search),
        ] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                request = request.query(key, value);
            }
        }
        if let Some(order) = self.sort_by {
            request = request.query("sort_by", order.as_str());
        }
        if let Some(rating) = self.min_rating {
            request = request.query("min_rating", rating.clamp(0.0, 5.0));
        }
        request
    }
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let request = query.apply(ApiRequest::get("/products/"));
        self.gateway().send_json(request, Access::Public).await
    }

    pub async fn product(&self, product_id: &str) -> Result<Product, ApiError> {
        let request = ApiRequest::get("/products").push(product_id);
        self.gateway().send_json(request, Access::Public).await
    }

    pub async fn brands(&self) -> Result<Vec<String>, ApiError> {
        self.gateway()
            .send_json(ApiRequest::get("/products/brands/"), Access::Public)
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.gateway()
            .send_json(ApiRequest::get("/categories/"), Access::Public)
            .await
    }
}
