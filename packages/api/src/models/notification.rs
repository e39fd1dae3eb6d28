use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// An in-app notification addressed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    #[serde(default)]
    pub related_product_id: Option<String>,
    #[serde(default)]
    pub related_review_id: Option<String>,
    #[serde(default)]
    pub related_user_id: Option<String>,
    #[serde(default)]
    pub extra_data: Option<serde_json::Value>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /notifications/unread-count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub count: u64,
}
