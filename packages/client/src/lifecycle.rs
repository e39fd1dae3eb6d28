//! Cancellation scopes for screen-level fetches.
//!
//! A screen owns a [`Scope`] and hands [`ScopeHandle`]s to its controllers.
//! Dropping the scope (the screen unmounts) or calling [`Scope::cancel`]
//! cancels every handle: calls still in flight resolve as `None` and the
//! controller leaves its state untouched.
//!
//! [`BusyFlag`] is the per-control "in flight" marker that turns a second tap
//! into [`ActionError::Busy`](crate::ActionError::Busy).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// Owner side. Cancels on drop.
#[derive(Debug)]
pub struct Scope {
    cancelled: watch::Sender<bool>,
}

impl Scope {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self { cancelled }
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            cancelled: self.cancelled.subscribe(),
            _detached: None,
        }
    }

    pub fn cancel(&self) {
        if !self.cancelled.send_replace(true) {
            tracing::debug!("scope cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Controller side of a [`Scope`].
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    cancelled: watch::Receiver<bool>,
    _detached: Option<Arc<watch::Sender<bool>>>,
}

impl ScopeHandle {
    /// A handle whose scope never ends, for controllers with no owning screen.
    pub fn detached() -> Self {
        let (tx, cancelled) = watch::channel(false);
        Self {
            cancelled,
            _detached: Some(Arc::new(tx)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    /// Drive `fut` unless the scope ends first.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        let mut cancelled = self.cancelled.clone();
        tokio::select! {
            biased;
            _ = cancelled.wait_for(|c| *c) => None,
            output = fut => (!self.is_cancelled()).then_some(output),
        }
    }
}

/// Shared "mutation in flight" flag for one control.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark busy until the guard drops; `None` if already busy.
    pub fn try_begin(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }
}

#[must_use]
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_flag_guard() {
        let flag = BusyFlag::new();
        let guard = flag.try_begin();
        assert!(guard.is_some());
        assert!(flag.is_busy());
        assert!(flag.try_begin().is_none());
        drop(guard);
        assert!(!flag.is_busy());
    }

    #[tokio::test]
    async fn test_live_scope_runs_to_completion() {
        let scope = Scope::new();
        let handle = scope.handle();
        assert_eq!(handle.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_dropped_scope_cancels_handles() {
        let scope = Scope::new();
        let handle = scope.handle();
        drop(scope);

        assert!(handle.is_cancelled());
        assert_eq!(handle.run(async { 7 }).await, None);
    }

    #[tokio::test]
    async fn test_cancel_during_flight() {
        let scope = Scope::new();
        let handle = scope.handle();

        let output = handle
            .run(async {
                scope.cancel();
                7
            })
            .await;
        assert_eq!(output, None);
    }

    #[tokio::test]
    async fn test_detached_handle_never_cancels() {
        let handle = ScopeHandle::detached();
        assert!(!handle.is_cancelled());
        assert_eq!(handle.run(async { "ok" }).await, Some("ok"));
    }
}
