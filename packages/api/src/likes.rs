//! Like/dislike reactions on reviews.

use serde::Serialize;
use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{LikeStats, Message, Reaction};
use crate::transport::{ApiRequest, Transport};

#[derive(Serialize)]
struct ReactionBody {
    is_like: bool,
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    /// Like or dislike a review. Repeating the caller's current reaction
    /// removes it server-side.
    pub async fn react(&self, review_id: &str, reaction: Reaction) -> Result<Message, ApiError> {
        let request = ApiRequest::post("/reviews").push(review_id).push("like").json(
            &ReactionBody {
                is_like: reaction.is_like(),
            },
        )?;
        self.gateway().send_json(request, Access::Required).await
    }

    /// Counts plus the caller's own reaction when signed in.
    pub async fn like_stats(&self, review_id: &str) -> Result<LikeStats, ApiError> {
        let request = ApiRequest::get("/reviews").push(review_id).push("likes");
        self.gateway().send_json(request, Access::Optional).await
    }
}
