//! In-app notifications of the signed-in user.

use serde::Serialize;
use store::KeyValueStore;

use crate::client::Client;
use crate::error::ApiError;
use crate::gateway::Access;
use crate::models::{Message, Notification, UnreadCount};
use crate::transport::{ApiRequest, Transport};

#[derive(Serialize)]
struct ReadBody {
    is_read: bool,
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: KeyValueStore + Clone,
{
    pub async fn notifications(&self, unread_only: bool) -> Result<Vec<Notification>, ApiError> {
        let mut request = ApiRequest::get("/notifications");
        if unread_only {
            request = request.query("unread_only", true);
        }
        self.gateway().send_json(request, Access::Required).await
    }

    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let count: UnreadCount = self
            .gateway()
            .send_json(ApiRequest::get("/notifications/unread-count"), Access::Required)
            .await?;
        Ok(count.count)
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<Notification, ApiError> {
        let request = ApiRequest::patch("/notifications").push(notification_id)
            .json(&ReadBody { is_read: true })?;
        self.gateway().send_json(request, Access::Required).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<Message, ApiError> {
        self.gateway()
            .send_json(ApiRequest::post("/notifications/mark-all-read"), Access::Required)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use reqwest::Method;
    use serde_json::json;
    use store::MemoryStore;

    #[tokio::test]
    async fn test_unread_filter_and_count() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "/notifications", 200, json!([]));
        mock.on(Method::GET, "/notifications/unread-count", 200, json!({"count": 4}));
        let client = Client::new(mock.clone(), MemoryStore::new());
        client.session().adopt("T1".to_string(), None);

        assert!(client.notifications(true).await.unwrap().is_empty());
        assert_eq!(
            mock.last_request().unwrap().query,
            vec![("unread_only".to_string(), "true".to_string())]
        );
        assert_eq!(client.unread_count().await.unwrap(), 4);
    }
}
