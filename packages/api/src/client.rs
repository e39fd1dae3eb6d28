//! The [`Client`] context object frontends pass to their screens.
//!
//! A `Client` owns one [`SessionStore`] and one [`Gateway`] over it. Clones
//! share both. Teardown: dropping the last clone drops the gateway's 401 hook;
//! building a new `Client` (e.g. after switching backends) starts a fresh
//! session with its own hook, so the two never trigger each other's logout.

use store::KeyValueStore;

use crate::gateway::Gateway;
use crate::session::SessionStore;
use crate::transport::Transport;

/// Session + gateway bundle; every backend call is a method on it.
pub struct Client<T, S> {
    gateway: Gateway<T, S>,
}

impl<T: Clone, S: Clone> Clone for Client<T, S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    pub fn new(transport: T, store: S) -> Self {
        Self {
            gateway: Gateway::new(transport, SessionStore::new(store)),
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        self.gateway.session()
    }

    pub fn gateway(&self) -> &Gateway<T, S> {
        &self.gateway
    }

    pub fn transport(&self) -> &T {
        self.gateway.transport()
    }
}
