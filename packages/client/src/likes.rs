//! Like/dislike buttons under each review.
//!
//! Unlike the favorite heart these are not optimistic: a reaction is posted
//! first, then the counts and the review list are fetched again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use api::{Client, LikeStats, Reaction, Review, Transport};
use store::KeyValueStore;

use crate::error::ActionError;
use crate::lifecycle::{BusyFlag, ScopeHandle};
use crate::notice::Notices;
use crate::optimistic::TentativeId;
use crate::reviews::ReviewThread;

pub struct LikeBoard<T, S> {
    client: Client<T, S>,
    scope: ScopeHandle,
    notices: Notices,
    busy: BusyFlag,
    stats: Arc<Mutex<HashMap<String, LikeStats>>>,
}

impl<T, S> LikeBoard<T, S>
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
            stats: Arc::default(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn stats(&self, review_id: &str) -> Option<LikeStats> {
        self.lock().get(review_id).copied()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Fetch counts for every listed review, one call each. Reviews that fail
    /// are left out; tentative reviews are skipped.
    pub async fn refresh(&self, reviews: &[Review]) -> Result<(), ActionError> {
        let mut fresh = HashMap::new();
        for review in reviews.iter().filter(|r| !TentativeId::is_tentative(&r.id)) {
            let outcome = self
                .scope
                .run(self.client.like_stats(&review.id))
                .await
                .ok_or(ActionError::Cancelled)?;
            match outcome {
                Ok(stats) => {
                    fresh.insert(review.id.clone(), stats);
                }
                Err(e) => tracing::debug!(review = %review.id, error = %e, "like stats unavailable"),
            }
        }

        let mut stats = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        *stats = fresh;
        Ok(())
    }

    /// Post a reaction, then reload `thread` and the counts.
    pub async fn react(
        &self,
        thread: &ReviewThread<T, S>,
        review_id: &str,
        reaction: Reaction,
    ) -> Result<(), ActionError> {
        if !self.client.session().is_authenticated() {
            return Err(ActionError::SignInRequired);
        }
        if TentativeId::is_tentative(review_id) {
            return Err(ActionError::invalid("This review is still being posted"));
        }
        let _guard = self.busy.try_begin().ok_or(ActionError::Busy)?;

        let outcome = self
            .scope
            .run(self.client.react(review_id, reaction))
            .await
            .ok_or(ActionError::Cancelled)?;
        if let Err(e) = outcome {
            tracing::error!(review = %review_id, error = %e, "reaction failed");
            let err = ActionError::from_api(&e, "Could not save your reaction");
            self.notices.error(err.to_string());
            return Err(err);
        }

        if let Err(e) = thread.load().await {
            tracing::warn!(error = %e, "reload after reaction failed");
        }
        self.refresh(&thread.reviews()).await
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, LikeStats>> {
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }
}
