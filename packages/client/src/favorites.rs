//! Favorite heart on a product page and the favorites screen.
//!
//! The heart is optimistic: it flips as soon as it is tapped and flips back
//! only if the backend refuses.

use std::sync::{Arc, Mutex, MutexGuard};

use api::{Client, Favorite, Transport};
use store::KeyValueStore;

use crate::error::ActionError;
use crate::lifecycle::ScopeHandle;
use crate::notice::Notices;
use crate::optimistic::OptimisticFlag;

pub struct FavoriteToggle<T, S> {
    client: Client<T, S>,
    product_id: String,
    scope: ScopeHandle,
    notices: Notices,
    flag: Arc<Mutex<OptimisticFlag>>,
}

impl<T, S> FavoriteToggle<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>, product_id: impl Into<String>, scope: ScopeHandle) -> Self {
        Self {
            client,
            product_id: product_id.into(),
            scope,
            notices: Notices::new(),
            flag: Arc::default(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn is_favorite(&self) -> bool {
        self.lock().value()
    }

    /// True while a toggle is waiting for the backend.
    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// Read the server-side flag. Signed-out callers see "not a favorite";
    /// lookup failures keep the current value.
    pub async fn load(&self) -> Result<(), ActionError> {
        if !self.client.session().is_authenticated() {
            self.lock().load(false);
            return Ok(());
        }
        let outcome = self
            .scope
            .run(self.client.is_favorite(&self.product_id))
            .await
            .ok_or(ActionError::Cancelled)?;
        match outcome {
            Ok(value) => {
                self.lock().load(value);
            }
            Err(e) => {
                tracing::warn!(product = %self.product_id, error = %e, "favorite lookup failed");
            }
        }
        Ok(())
    }

    /// Flip the heart, then tell the backend. Returns the value now shown.
    pub async fn toggle(&self) -> Result<bool, ActionError> {
        if !self.client.session().is_authenticated() {
            return Err(ActionError::SignInRequired);
        }
        let target = self.lock().flip().ok_or(ActionError::Busy)?;

        let outcome = self
            .scope
            .run(self.client.set_favorite(&self.product_id, target))
            .await
            .ok_or(ActionError::Cancelled)?;

        match outcome {
            Ok(()) => {
                self.lock().settle();
                tracing::debug!(product = %self.product_id, favorite = target, "favorite updated");
                Ok(target)
            }
            Err(e) => {
                self.lock().revert();
                tracing::error!(product = %self.product_id, error = %e, "favorite toggle failed");
                let err = ActionError::from_api(&e, "Could not update favorites");
                self.notices.error(err.to_string());
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, OptimisticFlag> {
        self.flag.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Default)]
struct ShelfState {
    favorites: Vec<Favorite>,
    loaded: bool,
}

/// The caller's favorites, most recent first as the backend sends them.
pub struct FavoritesShelf<T, S> {
    client: Client<T, S>,
    scope: ScopeHandle,
    state: Arc<Mutex<ShelfState>>,
}

impl<T, S> FavoritesShelf<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>, scope: ScopeHandle) -> Self {
        Self {
            client,
            scope,
            state: Arc::default(),
        }
    }

    pub fn favorites(&self) -> Vec<Favorite> {
        self.lock().favorites.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    /// Fetch the list. Also serves pull-to-refresh.
    pub async fn load(&self) -> Result<(), ActionError> {
        let outcome = self
            .scope
            .run(self.client.favorites())
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        state.loaded = true;
        match outcome {
            Ok(favorites) => {
                state.favorites = favorites;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load favorites");
                if e.is_unauthorized() || matches!(e, api::ApiError::NotAuthenticated) {
                    state.favorites.clear();
                }
                Err(ActionError::from_api(&e, "Could not load favorites"))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ShelfState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product, signed_in, signed_out};
    use api::mock::MockTransport;
    use api::{Method, ACCESS_TOKEN_KEY};
    use serde_json::json;

    fn favorite_record() -> serde_json::Value {
        json!({
            "id": "f1",
            "product_id": "p1",
            "created_at": "2025-11-19T10:00:00",
            "product": product("p1", 3)
        })
    }

    fn backend() -> MockTransport {
        let mock = MockTransport::new();
        mock.on(Method::GET, "/products/p1/favorite", 200, json!({"is_favorite": false}));
        mock.on(Method::POST, "/products/p1/favorite", 200, favorite_record());
        mock.on(Method::DELETE, "/products/p1/favorite", 200, json!({"message": "Removed"}));
        mock
    }

    #[tokio::test]
    async fn test_toggle_twice_returns_to_original() {
        let mock = backend();
        let (client, _) = signed_in(&mock).await;
        let heart = FavoriteToggle::new(client, "p1", ScopeHandle::detached());
        heart.load().await.unwrap();
        let original = heart.is_favorite();

        assert_eq!(heart.toggle().await, Ok(!original));
        assert_eq!(heart.toggle().await, Ok(original));
        assert_eq!(heart.is_favorite(), original);
        assert!(!heart.is_pending());

        assert_eq!(mock.requests_to(Method::POST, "/products/p1/favorite").len(), 1);
        assert_eq!(mock.requests_to(Method::DELETE, "/products/p1/favorite").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_toggle_reverts() {
        let mock = backend();
        mock.clear(Method::POST, "/products/p1/favorite")
            .on(Method::POST, "/products/p1/favorite", 500, json!({}));
        let (client, _) = signed_in(&mock).await;
        let heart = FavoriteToggle::new(client, "p1", ScopeHandle::detached());

        let err = heart.toggle().await.unwrap_err();

        assert_eq!(err, ActionError::Failed("Could not update favorites".to_string()));
        assert!(!heart.is_favorite());
        assert!(!heart.is_pending());
    }

    #[tokio::test]
    async fn test_unauthorized_toggle_signs_out() {
        let mock = backend();
        mock.clear(Method::POST, "/products/p1/favorite")
            .on(Method::POST, "/products/p1/favorite", 401, json!({"detail": "Token expired"}));
        let (client, store) = signed_in(&mock).await;
        let heart = FavoriteToggle::new(client.clone(), "p1", ScopeHandle::detached());

        assert_eq!(heart.toggle().await, Err(ActionError::SessionExpired));
        assert!(!heart.is_favorite());
        assert!(!client.session().is_authenticated());
        assert_eq!(store.snapshot(ACCESS_TOKEN_KEY), None);

        // The next tap fails locally
        assert_eq!(heart.toggle().await, Err(ActionError::SignInRequired));
    }

    #[tokio::test]
    async fn test_signed_out_heart_is_empty() {
        let mock = backend();
        let heart = FavoriteToggle::new(signed_out(&mock), "p1", ScopeHandle::detached());
        heart.load().await.unwrap();
        assert!(!heart.is_favorite());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_shelf_loads_embedded_products() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "/users/me/favorites", 200, json!([favorite_record()]));
        let (client, _) = signed_in(&mock).await;
        let shelf = FavoritesShelf::new(client, ScopeHandle::detached());

        shelf.load().await.unwrap();

        let favorites = shelf.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].product.title(), "Apple iPhone 15");
        assert!(shelf.is_loaded());
    }

    #[tokio::test]
    async fn test_shelf_requires_sign_in() {
        let mock = MockTransport::new();
        let shelf = FavoritesShelf::new(signed_out(&mock), ScopeHandle::detached());
        assert_eq!(shelf.load().await, Err(ActionError::SignInRequired));
        assert!(mock.requests().is_empty());
    }
}
