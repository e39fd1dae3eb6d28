//! Session lifecycle flows: startup, login, registration, logout.

use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{Credentials, RegisterRequest, TokenPair, UserInfo};
use crate::session::AuthState;
use crate::transport::{ApiRequest, Transport};

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    /// Restore the session left by a previous run.
    ///
    /// A persisted token is adopted and validated with `GET /users/me`; any
    /// failure clears token, profile and storage. No retry. The session leaves
    /// its loading phase exactly once, whatever the outcome.
    pub async fn initialize(&self) -> AuthState {
        let session = self.session();
        match session.persisted_tokens().await {
            Ok((Some(token), refresh_token)) => {
                session.adopt(token.clone(), refresh_token);
                match self.resolve_profile(&token).await {
                    Ok(user) => tracing::info!(user = %user.id, "restored session"),
                    Err(e) => {
                        tracing::warn!(error = %e, "persisted token rejected, signing out");
                        session.logout_if(&token).await;
                    }
                }
            }
            Ok((None, _)) => tracing::debug!("no persisted session"),
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted session");
                session.logout().await;
            }
        }
        session.finish_loading();
        session.state()
    }

    /// Exchange credentials for tokens and resolve the profile.
    ///
    /// On any failure the session this login started ends signed out;
    /// nothing half-established survives. A newer session that replaced it
    /// meanwhile is left alone.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserInfo, ApiError> {
        let request = ApiRequest::post("/auth/login").form(credentials.form_fields());
        let pair: TokenPair = self.gateway().send_json(request, Access::Public).await?;

        let session = self.session();
        if let Err(e) = session.persist(&pair).await {
            tracing::warn!(error = %e, "could not persist tokens");
            session.logout().await;
            return Err(e);
        }
        session.adopt(pair.access_token.clone(), Some(pair.refresh_token.clone()));

        match self.resolve_profile(&pair.access_token).await {
            Ok(user) => {
                tracing::info!(user = %user.id, "signed in");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile lookup after login failed");
                session.logout_if(&pair.access_token).await;
                Err(e)
            }
        }
    }

    /// Create an account, then sign in with the same credentials.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, ApiError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        let request = ApiRequest::post("/auth/register").json(&body)?;
        self.gateway().send(request, Access::Public).await?;
        tracing::info!("account registered");

        self.login(&Credentials::new(email, password)).await
    }

    /// Sign out. Never fails.
    pub async fn logout(&self) {
        self.session().logout().await;
    }

    /// Fetch the profile of whoever the active token belongs to.
    pub async fn me(&self) -> Result<UserInfo, ApiError> {
        self.gateway()
            .send_json(ApiRequest::get("/users/me"), Access::Required)
            .await
    }

    async fn resolve_profile(&self, token: &str) -> Result<UserInfo, ApiError> {
        let user = self.me().await?;
        if !self.session().resolve(token, user.clone()) {
            // Signed out or replaced while the lookup was in flight.
            return Err(ApiError::NotAuthenticated);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use crate::transport::{ApiResponse, RequestBody};
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;
    use store::{MemoryStore, StoreError};
    use tokio::sync::Notify;

    fn profile(email: &str) -> serde_json::Value {
        json!({
            "id": "u-1",
            "email": email,
            "full_name": "Ada Lovelace",
            "is_active": true,
            "is_superuser": false,
            "two_factor_enabled": false,
            "created_at": "2025-11-18T09:00:00"
        })
    }

    fn backend() -> MockTransport {
        let mock = MockTransport::new();
        mock.on(
            Method::POST,
            "/auth/login",
            200,
            json!({"access_token": "T1", "refresh_token": "R1", "token_type": "bearer"}),
        );
        mock.on(Method::GET, "/users/me", 200, profile("a@b.com"));
        mock
    }

    #[tokio::test]
    async fn test_login_establishes_session() {
        let store = MemoryStore::new();
        let mock = backend();
        mock.on(Method::GET, "/users/me/favorites", 200, json!([]));
        let client = Client::new(mock.clone(), store.clone());

        let user = client.login(&Credentials::new("a@b.com", "secret")).await.unwrap();

        assert_eq!(user.email, "a@b.com");
        assert!(client.session().is_authenticated());
        assert!(client.session().current_user().is_some());
        assert_eq!(store.snapshot(ACCESS_TOKEN_KEY).as_deref(), Some("T1"));
        assert_eq!(store.snapshot(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));

        let login = &mock.requests_to(Method::POST, "/auth/login")[0];
        assert_eq!(
            login.body,
            RequestBody::Form(vec![
                ("username".to_string(), "a@b.com".to_string()),
                ("password".to_string(), "secret".to_string()),
            ])
        );
        assert_eq!(login.authorization(), None);

        client.favorites().await.unwrap();
        assert_eq!(mock.last_request().unwrap().authorization().as_deref(), Some("Bearer T1"));
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let store = MemoryStore::new();
        let client = Client::new(backend(), store.clone());

        client.login(&Credentials::new("a@b.com", "secret")).await.unwrap();
        client.logout().await;

        assert!(!client.session().is_authenticated());
        assert!(client.session().current_user().is_none());
        assert_eq!(store.snapshot(ACCESS_TOKEN_KEY), None);
        assert_eq!(store.snapshot(REFRESH_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_login_error_uses_backend_detail() {
        let mock = MockTransport::new();
        mock.on(Method::POST, "/auth/login", 401, json!({"detail": "Incorrect credentials"}));
        let client = Client::new(mock, MemoryStore::new());

        let err = client.login(&Credentials::new("a@b.com", "wrong")).await.unwrap_err();
        assert_eq!(err.user_message("Could not sign in"), "Incorrect credentials");
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_fails_when_profile_lookup_fails() {
        let store = MemoryStore::new();
        let mock = MockTransport::new();
        mock.on(
            Method::POST,
            "/auth/login",
            200,
            json!({"access_token": "T1", "refresh_token": "R1"}),
        );
        mock.on(Method::GET, "/users/me", 500, json!({"detail": "boom"}));
        let client = Client::new(mock, store.clone());

        assert!(client.login(&Credentials::new("a@b.com", "secret")).await.is_err());
        assert!(!client.session().is_authenticated());
        assert_eq!(store.snapshot(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_initialize_restores_valid_token() {
        let store = MemoryStore::new()
            .with_value(ACCESS_TOKEN_KEY, "T9")
            .with_value(REFRESH_TOKEN_KEY, "R9");
        let mock = backend();
        let client = Client::new(mock.clone(), store);

        let state = client.initialize().await;

        assert!(!state.loading);
        assert!(state.is_authenticated());
        assert_eq!(state.refresh_token.as_deref(), Some("R9"));
        assert_eq!(state.user.unwrap().email, "a@b.com");
        assert_eq!(mock.last_request().unwrap().authorization().as_deref(), Some("Bearer T9"));
    }

    #[tokio::test]
    async fn test_initialize_with_rejected_token_ends_clean() {
        let store = MemoryStore::new()
            .with_value(ACCESS_TOKEN_KEY, "stale")
            .with_value(REFRESH_TOKEN_KEY, "R0");
        let mock = MockTransport::new();
        mock.on(Method::GET, "/users/me", 401, json!({"detail": "Could not validate credentials"}));
        let client = Client::new(mock.clone(), store.clone());

        let state = client.initialize().await;

        assert!(!state.loading);
        assert!(!state.is_authenticated());
        assert!(state.user.is_none());
        assert_eq!(store.snapshot(ACCESS_TOKEN_KEY), None);
        assert_eq!(store.snapshot(REFRESH_TOKEN_KEY), None);
        // No retry
        assert_eq!(mock.requests_to(Method::GET, "/users/me").len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_without_token_skips_network() {
        let mock = MockTransport::new();
        let client = Client::new(mock.clone(), MemoryStore::new());

        let mut updates = client.session().subscribe();
        let state = client.initialize().await;

        assert!(!state.loading);
        assert!(!state.is_authenticated());
        assert!(mock.requests().is_empty());
        assert!(updates.has_changed().unwrap());
        assert!(!updates.borrow_and_update().loading);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let mock = backend();
        mock.on(Method::POST, "/auth/register", 201, profile("new@b.com"));
        let client = Client::new(mock.clone(), MemoryStore::new());

        client.register("Ada Lovelace", "new@b.com", "secret1").await.unwrap();

        let register = &mock.requests_to(Method::POST, "/auth/register")[0];
        assert_eq!(
            register.body,
            RequestBody::Json(json!({
                "email": "new@b.com",
                "password": "secret1",
                "full_name": "Ada Lovelace"
            }))
        );
        assert_eq!(mock.requests_to(Method::POST, "/auth/login").len(), 1);
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_failure_skips_login() {
        let mock = backend();
        mock.on(Method::POST, "/auth/register", 400, json!({"detail": "Email already registered"}));
        let client = Client::new(mock.clone(), MemoryStore::new());

        let err = client.register("Ada", "a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
        assert!(mock.requests_to(Method::POST, "/auth/login").is_empty());
    }

    #[derive(Clone, Default)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(Some("T1".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("quota exceeded".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_logout_swallows_storage_errors() {
        let client = Client::new(backend(), BrokenStore);
        client.initialize().await;
        assert!(client.session().is_authenticated());

        client.logout().await;
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_fails_cleanly_when_tokens_cannot_be_stored() {
        let client = Client::new(backend(), BrokenStore);
        let err = client.login(&Credentials::new("a@b.com", "secret")).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
        assert!(!client.session().is_authenticated());
    }

    /// Holds the profile lookup for token T0 until another lookup completes,
    /// then rejects it.
    #[derive(Clone)]
    struct SlowStartup {
        backend: MockTransport,
        release: Arc<Notify>,
    }

    impl Transport for SlowStartup {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            let lookup = request.path == "/users/me";
            if lookup && request.bearer.as_deref() == Some("T0") {
                self.release.notified().await;
                return Ok(ApiResponse::new(401, r#"{"detail": "Could not validate credentials"}"#));
            }
            let response = self.backend.send(request).await;
            if lookup {
                self.release.notify_one();
            }
            response
        }
    }

    #[tokio::test]
    async fn test_stale_startup_check_keeps_fresh_login() {
        let store = MemoryStore::new()
            .with_value(ACCESS_TOKEN_KEY, "T0")
            .with_value(REFRESH_TOKEN_KEY, "R0");
        let transport = SlowStartup {
            backend: backend(),
            release: Arc::new(Notify::new()),
        };
        let client = Client::new(transport, store.clone());
        let credentials = Credentials::new("a@b.com", "secret");

        let (state, login) = tokio::join!(client.initialize(), client.login(&credentials));

        assert!(login.is_ok());
        assert!(!state.loading);
        assert!(client.session().is_authenticated());
        assert_eq!(client.session().token().as_deref(), Some("T1"));
        assert_eq!(client.session().current_user().unwrap().email, "a@b.com");
        assert_eq!(store.snapshot(ACCESS_TOKEN_KEY).as_deref(), Some("T1"));
        assert_eq!(store.snapshot(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        assert_eq!(client.gateway().hook().fired(), 0);
    }
}
