//! # Session store: who is signed in
//!
//! [`SessionStore`] is the single source of truth for "is the caller
//! authenticated" and "who is the caller". It holds the active bearer token,
//! the refresh token persisted next to it, and the profile resolved with that
//! token, and mirrors the tokens into a [`KeyValueStore`] under
//! [`ACCESS_TOKEN_KEY`] / [`REFRESH_TOKEN_KEY`].
//!
//! ## State
//!
//! Every change is published as a whole [`AuthState`] through a
//! `tokio::sync::watch` channel, so token and profile always change together
//! and frontends can [`subscribe`](SessionStore::subscribe) to re-render.
//!
//! ```text
//! Unknown (loading) ──initialize──▶ Authenticated | Unauthenticated
//! Authenticated ──logout / failed profile / any 401──▶ Unauthenticated
//! ```
//!
//! A profile is only ever attached while the token it was fetched with is
//! still the active one (see [`SessionStore::resolve`]), so a logout racing a
//! profile fetch cannot resurrect a user.
//!
//! The flows that talk to the backend (`initialize`, `login`, `register`)
//! live on [`Client`](crate::Client); this type only owns the state and its
//! persistence. The store is the sole writer of session state.

use std::sync::{Arc, Mutex, Weak};

use store::KeyValueStore;
use tokio::sync::watch;

use crate::error::ApiError;
use crate::gateway::UnauthorizedHook;
use crate::models::{TokenPair, UserInfo};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "userToken";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    /// Persisted for a future refresh flow; nothing exchanges it today.
    pub refresh_token: Option<String>,
    pub user: Option<UserInfo>,
    /// True until startup has decided between signed in and signed out.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            token: None,
            refresh_token: None,
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    /// Token presence only; says nothing about server-side validity.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Session state plus its durable mirror.
pub struct SessionStore<S> {
    store: S,
    state: Arc<watch::Sender<AuthState>>,
    hook: Arc<Mutex<Weak<UnauthorizedHook<S>>>>,
}

impl<S: Clone> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            state: Arc::clone(&self.state),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<S> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.is_authenticated())
            .field("user", &state.user.as_ref().map(|u| u.id.as_str()))
            .field("loading", &state.loading)
            .finish()
    }
}

impl<S: KeyValueStore + Clone> SessionStore<S> {
    pub fn new(store: S) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            store,
            state: Arc::new(state),
            hook: Arc::new(Mutex::new(Weak::new())),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every subsequent session change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The token as of right now. Callers must not cache it.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Clear the session in memory and in storage. Never fails: storage
    /// errors are logged and dropped.
    pub async fn logout(&self) {
        let was_authenticated = self.state.send_if_modified(|state| {
            let changed = state.token.is_some() || state.user.is_some() || state.refresh_token.is_some();
            clear(state);
            changed
        });
        self.forget_persisted().await;

        if was_authenticated {
            tracing::info!("session signed out");
        }
    }

    /// Sign out only while `token` is still the active token.
    ///
    /// Flows that started under an older token (a startup check racing a
    /// login, a 401 for a replaced token) must not end a newer session.
    /// Returns false and touches nothing when the token has moved on.
    pub async fn logout_if(&self, token: &str) -> bool {
        let matched = self.state.send_if_modified(|state| {
            if state.token.as_deref() != Some(token) {
                return false;
            }
            clear(state);
            true
        });
        if !matched {
            tracing::debug!("sign-out for a replaced token ignored");
            return false;
        }
        self.forget_persisted().await;
        tracing::info!("session signed out");
        true
    }

    async fn forget_persisted(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(key, error = %e, "failed to clear persisted token");
            }
        }
    }

    /// The live 401 hook for this store, installing it on first use.
    ///
    /// Every gateway built on this store shares the same hook. It is torn
    /// down when the last gateway holding it is dropped.
    pub fn unauthorized_hook(&self) -> Arc<UnauthorizedHook<S>> {
        let mut slot = self.hook.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hook) = slot.upgrade() {
            return hook;
        }
        let hook = Arc::new(UnauthorizedHook::new(self.clone()));
        *slot = Arc::downgrade(&hook);
        tracing::debug!("unauthorized hook installed");
        hook
    }

    pub fn has_unauthorized_hook(&self) -> bool {
        self.hook
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .strong_count()
            > 0
    }

    /// Tokens left behind by a previous run.
    pub(crate) async fn persisted_tokens(&self) -> Result<(Option<String>, Option<String>), ApiError> {
        let token = self
            .store
            .get(ACCESS_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty());
        let refresh = self
            .store
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty());
        Ok((token, refresh))
    }

    pub(crate) async fn persist(&self, pair: &TokenPair) -> Result<(), ApiError> {
        self.store.set(ACCESS_TOKEN_KEY, &pair.access_token).await?;
        self.store.set(REFRESH_TOKEN_KEY, &pair.refresh_token).await?;
        Ok(())
    }

    /// Make `token` the active credential. Any previously resolved profile
    /// belongs to another token and is dropped.
    pub(crate) fn adopt(&self, token: String, refresh_token: Option<String>) {
        self.state.send_modify(|state| {
            state.token = Some(token);
            state.refresh_token = refresh_token;
            state.user = None;
        });
    }

    /// Attach `user` if `token` is still the active token.
    pub(crate) fn resolve(&self, token: &str, user: UserInfo) -> bool {
        self.state.send_if_modified(|state| {
            if state.token.as_deref() != Some(token) {
                return false;
            }
            state.user = Some(user);
            true
        })
    }

    /// Leave the loading phase. Only the first call has an effect.
    pub(crate) fn finish_loading(&self) -> bool {
        self.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        })
    }
}

fn clear(state: &mut AuthState) {
    state.token = None;
    state.refresh_token = None;
    state.user = None;
}
