//! Another user's profile card with its follow button.
//!
//! Following is optimistic like the favorite heart: the button and the
//! follower count change on tap and change back only if the backend refuses.

use std::sync::{Arc, Mutex, MutexGuard};

use api::{Client, Transport, UserProfile};
use store::KeyValueStore;

use crate::error::ActionError;
use crate::lifecycle::ScopeHandle;
use crate::notice::Notices;
use crate::optimistic::OptimisticFlag;

#[derive(Debug, Default)]
struct CardState {
    profile: Option<UserProfile>,
    following: OptimisticFlag,
    error: Option<String>,
}

impl CardState {
    fn shift_followers(&mut self, following: bool) {
        if let Some(profile) = self.profile.as_mut() {
            profile.follower_count = if following {
                profile.follower_count.saturating_add(1)
            } else {
                profile.follower_count.saturating_sub(1)
            };
        }
    }
}

pub struct ProfileCard<T, S> {
    client: Client<T, S>,
    user_id: String,
    scope: ScopeHandle,
    notices: Notices,
    state: Arc<Mutex<CardState>>,
}

impl<T, S> ProfileCard<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>, user_id: impl Into<String>, scope: ScopeHandle) -> Self {
        Self {
            client,
            user_id: user_id.into(),
            scope,
            notices: Notices::new(),
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

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The profile as shown, follower count included.
    pub fn profile(&self) -> Option<UserProfile> {
        self.lock().profile.clone()
    }

    pub fn is_following(&self) -> bool {
        self.lock().following.value()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().following.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// The signed-in user's own card has no follow button.
    pub fn is_own(&self) -> bool {
        self.client
            .session()
            .current_user()
            .is_some_and(|user| user.id == self.user_id)
    }

    pub async fn load(&self) -> Result<(), ActionError> {
        let outcome = self
            .scope
            .run(self.client.user_profile(&self.user_id))
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        match outcome {
            Ok(profile) => {
                if state.following.load(profile.is_following) {
                    state.profile = Some(profile);
                }
                state.error = None;
                Ok(())
            }
            Err(e) => {
                let err = ActionError::from_api(&e, "Could not load profile");
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Follow or unfollow. Returns whether the caller now follows.
    pub async fn toggle(&self) -> Result<bool, ActionError> {
        if !self.client.session().is_authenticated() {
            return Err(ActionError::SignInRequired);
        }
        if self.is_own() {
            return Err(ActionError::invalid("You cannot follow yourself"));
        }
        let target = {
            let mut state = self.lock();
            let target = state.following.flip().ok_or(ActionError::Busy)?;
            state.shift_followers(target);
            target
        };

        let outcome = self
            .scope
            .run(self.client.set_following(&self.user_id, target))
            .await
            .ok_or(ActionError::Cancelled)?;

        match outcome {
            Ok(()) => {
                self.lock().following.settle();
                tracing::debug!(user = %self.user_id, following = target, "follow updated");
                Ok(target)
            }
            Err(e) => {
                {
                    let mut state = self.lock();
                    state.following.revert();
                    state.shift_followers(!target);
                }
                tracing::error!(user = %self.user_id, error = %e, "follow toggle failed");
                let err = ActionError::from_api(&e, "Could not update follow");
                self.notices.error(err.to_string());
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, CardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
