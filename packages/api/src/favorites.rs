//! Favorites: per-product flag and the caller's favorites list.

use reqwest::Method;
use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{Favorite, FavoriteStatus};
use crate::transport::{ApiRequest, Transport};

fn favorite(method: Method, product_id: &str) -> ApiRequest {
    ApiRequest::new(method, "/products").push(product_id).push("favorite")
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    pub async fn is_favorite(&self, product_id: &str) -> Result<bool, ApiError> {
        let status: FavoriteStatus = self
            .gateway()
            .send_json(favorite(Method::GET, product_id), Access::Required)
            .await?;
        Ok(status.is_favorite)
    }

    pub async fn add_favorite(&self, product_id: &str) -> Result<Favorite, ApiError> {
        self.gateway()
            .send_json(favorite(Method::POST, product_id), Access::Required)
            .await
    }

    pub async fn remove_favorite(&self, product_id: &str) -> Result<(), ApiError> {
        self.gateway()
            .send(favorite(Method::DELETE, product_id), Access::Required)
            .await?;
        Ok(())
    }

    /// Add or remove, whichever reaches `favorite`. Only the status counts;
    /// the body of an add is not decoded.
    pub async fn set_favorite(&self, product_id: &str, favorite: bool) -> Result<(), ApiError> {
        if !favorite {
            return self.remove_favorite(product_id).await;
        }
        self.gateway()
            .send(self::favorite(Method::POST, product_id), Access::Required)
            .await?;
        Ok(())
    }

    pub async fn favorites(&self) -> Result<Vec<Favorite>, ApiError> {
        self.gateway()
            .send_json(ApiRequest::get("/users/me/favorites"), Access::Required)
            .await
    }
}
