//! Notification inbox: list, unread badge, mark read.

use std::sync::{Arc, Mutex, MutexGuard};

use api::{Client, Notification, Transport};
use store::KeyValueStore;

use crate::error::ActionError;
use crate::lifecycle::{BusyFlag, ScopeHandle};
use crate::notice::Notices;

#[derive(Debug, Default)]
struct InboxState {
    notifications: Vec<Notification>,
    unread: u64,
}

pub struct NotificationInbox<T, S> {
    client: Client<T, S>,
    scope: ScopeHandle,
    notices: Notices,
    busy: BusyFlag,
    state: Arc<Mutex<InboxState>>,
}

impl<T, S> NotificationInbox<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>, scope: ScopeHandle) -> Self {
        Self {
            client,
            scope,
            notices: Notices::new(),
            busy: BusyFlag::new(),
            state: Arc::default(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn unread_count(&self) -> u64 {
        self.lock().unread
    }

    /// Fetch the list and the unread count. A failed count keeps the old one.
    pub async fn refresh(&self) -> Result<(), ActionError> {
        if !self.client.session().is_authenticated() {
            return Err(ActionError::SignInRequired);
        }
        let list = self
            .scope
            .run(self.client.notifications(false))
            .await
            .ok_or(ActionError::Cancelled)?;
        let count = self
            .scope
            .run(self.client.unread_count())
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        match count {
            Ok(count) => state.unread = count,
            Err(e) => tracing::warn!(error = %e, "could not load unread count"),
        }
        match list {
            Ok(notifications) => {
                state.notifications = notifications;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load notifications");
                Err(ActionError::from_api(&e, "Could not load notifications"))
            }
        }
    }

    /// Mark one notification read, then refresh. Already-read entries are
    /// left alone.
    pub async fn open(&self, notification_id: &str) -> Result<(), ActionError> {
        let already_read = self
            .lock()
            .notifications
            .iter()
            .any(|n| n.id == notification_id && n.is_read);
        if already_read {
            return Ok(());
        }
        self.mutate(self.client.mark_notification_read(notification_id), "Could not mark as read")
            .await
    }

    pub async fn mark_all_read(&self) -> Result<(), ActionError> {
        self.mutate(self.client.mark_all_notifications_read(), "Could not mark all as read")
            .await
    }

    async fn mutate<R>(
        &self,
        call: impl std::future::Future<Output = Result<R, api::ApiError>>,
        fallback: &str,
    ) -> Result<(), ActionError> {
        if !self.client.session().is_authenticated() {
            return Err(ActionError::SignInRequired);
        }
        let _guard = self.busy.try_begin().ok_or(ActionError::Busy)?;
        let outcome = self.scope.run(call).await.ok_or(ActionError::Cancelled)?;
        if let Err(e) = outcome {
            tracing::error!(error = %e, "{fallback}");
            let err = ActionError::from_api(&e, fallback);
            self.notices.error(err.to_string());
            return Err(err);
        }
        self.refresh().await
    }

    fn lock(&self) -> MutexGuard<'_, InboxState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
