use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Public profile from `GET /users/{id}/profile`.
///
/// `is_following` is only meaningful when the request carried a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub follower_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_following: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Full name when set, else the email.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// One edge of the follow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}
