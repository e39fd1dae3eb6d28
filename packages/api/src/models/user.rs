//! # Profile of the signed-in user
//!
//! [`UserInfo`] is what `GET /users/me` returns once a bearer token is
//! attached. The session keeps it as `current_user` for as long as the token
//! it was resolved with stays active.
//!
//! [`UserInfo::display_name`] picks the name shown next to content the user
//! authors: the full name when set, otherwise the local part of the email
//! address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Profile record of the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub two_factor_enabled: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl UserInfo {
    /// Full name if present, else the local part of the email, else nothing.
    pub fn display_name(&self) -> Option<&str> {
        if let Some(name) = self.full_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return Some(name);
            }
        }
        self.email
            .split('@')
            .next()
            .map(str::trim)
            .filter(|local| !local.is_empty())
    }
}
