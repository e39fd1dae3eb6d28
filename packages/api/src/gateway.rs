//! # Authorized request gateway
//!
//! Every backend call goes through a [`Gateway`]. It does two things a bare
//! [`Transport`] does not:
//!
//! 1. **Attaches the bearer token** according to the call's [`Access`] level,
//!    reading it from the [`SessionStore`] at send time. A request built
//!    before a login and sent after it carries the new token.
//! 2. **Collapses the session on 401.** Every response passes through the
//!    store's [`UnauthorizedHook`]; a 401 logs the session out *before* the
//!    error reaches the caller, whichever component issued the call.
//!
//! Statuses are then mapped onto [`ApiError`]: 2xx passes through, 401 becomes
//! [`ApiError::Unauthorized`], everything else [`ApiError::Rejected`] with the
//! backend's `detail`. Nothing is retried or queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use store::KeyValueStore;

use crate::error::ApiError;
use crate::models::ErrorBody;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Whether a call carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Never attach a token.
    Public,
    /// Attach the token when signed in; anonymous otherwise.
    Optional,
    /// Attach the token; refuse to send without one.
    Required,
}

/// Response-level hook that forces a logout on 401.
///
/// One hook exists per live [`SessionStore`]; obtain it with
/// [`SessionStore::unauthorized_hook`].
pub struct UnauthorizedHook<S> {
    session: SessionStore<S>,
    fired: AtomicU64,
}

impl<S: KeyValueStore + Clone> UnauthorizedHook<S> {
    pub(crate) fn new(session: SessionStore<S>) -> Self {
        Self {
            session,
            fired: AtomicU64::new(0),
        }
    }

    /// Inspect a response to a request sent with `bearer`. Returns true if
    /// it forced a logout.
    ///
    /// A 401 for a token that has since been replaced says nothing about the
    /// current session and is ignored. Anonymous 401s always sign out.
    pub async fn inspect(&self, response: &ApiResponse, path: &str, bearer: Option<&str>) -> bool {
        if response.status != 401 {
            return false;
        }
        let signed_out = match bearer {
            Some(token) => self.session.logout_if(token).await,
            None => {
                self.session.logout().await;
                true
            }
        };
        if signed_out {
            tracing::warn!(path, "401 from backend, forced logout");
            self.fired.fetch_add(1, Ordering::Relaxed);
        } else {
            tracing::debug!(path, "401 for a replaced token");
        }
        signed_out
    }

    /// How many forced logouts this hook has triggered.
    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }
}

/// Decorator around a [`Transport`] bound to one [`SessionStore`].
pub struct Gateway<T, S> {
    transport: T,
    session: SessionStore<S>,
    hook: Arc<UnauthorizedHook<S>>,
}

impl<T: Clone, S: Clone> Clone for Gateway<T, S> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            session: self.session.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<T, S> Gateway<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    pub fn new(transport: T, session: SessionStore<S>) -> Self {
        let hook = session.unauthorized_hook();
        Self {
            transport,
            session,
            hook,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn hook(&self) -> &UnauthorizedHook<S> {
        &self.hook
    }

    /// Send `request`, attaching the current token per `access`.
    pub async fn send(&self, mut request: ApiRequest, access: Access) -> Result<ApiResponse, ApiError> {
        request.bearer = match access {
            Access::Public => None,
            Access::Optional => self.session.token(),
            Access::Required => Some(self.session.token().ok_or(ApiError::NotAuthenticated)?),
        };
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authorized = request.bearer.is_some(),
            "backend request"
        );

        let path = request.path.clone();
        let bearer = request.bearer.clone();
        let response = self.transport.send(request).await?;
        self.hook.inspect(&response, &path, bearer.as_deref()).await;

        if response.is_success() {
            return Ok(response);
        }
        let detail = ErrorBody::parse(&response.body);
        tracing::debug!(path = %path, status = response.status, ?detail, "backend rejected request");
        if response.status == 401 {
            Err(ApiError::Unauthorized { detail })
        } else {
            Err(ApiError::Rejected {
                status: response.status,
                detail,
            })
        }
    }

    /// Send and decode a JSON body.
    pub async fn send_json<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        access: Access,
    ) -> Result<R, ApiError> {
        self.send(request, access).await?.json()
    }
}
