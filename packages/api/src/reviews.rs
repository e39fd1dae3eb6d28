//! Product reviews: newest-first listing and submission.

use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{NewReview, Review, ReviewSubmitted};
use crate::transport::{ApiRequest, Transport};

/// Page size used when listing reviews under a product.
pub const REVIEW_PAGE_SIZE: u32 = 20;

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    /// First page of a product's reviews, newest first.
    pub async fn product_reviews(&self, product_id: &str) -> Result<Vec<Review>, ApiError> {
        self.product_reviews_page(product_id, 0, REVIEW_PAGE_SIZE).await
    }

    pub async fn product_reviews_page(
        &self,
        product_id: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Review>, ApiError> {
        let request = ApiRequest::get("/products").push(product_id).push("reviews")
            .query("skip", skip)
            .query("limit", limit.clamp(1, 100));
        self.gateway().send_json(request, Access::Public).await
    }

    /// Submit a review. Signed-in callers are attached as the author;
    /// anonymous callers must set [`NewReview::username`].
    pub async fn submit_review(
        &self,
        product_id: &str,
        review: &NewReview,
    ) -> Result<ReviewSubmitted, ApiError> {
        let request = ApiRequest::post("/products").push(product_id).push("reviews")
            .json(review)?;
        self.gateway().send_json(request, Access::Optional).await
    }
}
