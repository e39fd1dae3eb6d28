//! Public user profiles and the follow graph.

use reqwest::Method;
use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{Follow, UserProfile};
use crate::transport::{ApiRequest, Transport};

fn follow(method: Method, user_id: &str) -> ApiRequest {
    ApiRequest::new(method, "/users").push(user_id).push("follow")
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    /// Anyone's profile. Signed-in callers also learn whether they follow it.
    pub async fn user_profile(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::get("/users").push(user_id).push("profile");
        self.gateway().send_json(request, Access::Optional).await
    }

    /// Follow or unfollow, whichever reaches `following`. Only the status
    /// counts.
    pub async fn set_following(&self, user_id: &str, following: bool) -> Result<(), ApiError> {
        let method = if following { Method::POST } else { Method::DELETE };
        self.gateway().send(follow(method, user_id), Access::Required).await?;
        Ok(())
    }

    pub async fn followers(&self) -> Result<Vec<Follow>, ApiError> {
        self.gateway()
            .send_json(ApiRequest::get("/users/me/followers"), Access::Required)
            .await
    }

    pub async fn following(&self) -> Result<Vec<Follow>, ApiError> {
        self.gateway()
            .send_json(ApiRequest::get("/users/me/following"), Access::Required)
            .await
    }
}
