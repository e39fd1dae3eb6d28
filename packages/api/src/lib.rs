//! # API crate: typed client for the Yorumator review backend
//!
//! This crate is the backbone every Yorumator frontend (CLI, desktop, web)
//! shares. It owns the signed-in session, routes every backend call through a
//! single authorized gateway, and exposes each endpoint as a typed method on
//! [`Client`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | [`SessionStore`]: token, refresh token, profile, loading flag; persisted via a [`store::KeyValueStore`] |
//! | [`gateway`] | [`Gateway`]: attaches the bearer token per [`Access`] level and forces a logout on any 401 |
//! | [`transport`] | [`Transport`] seam and the `reqwest`-backed [`HttpTransport`] |
//! | [`client`] | [`Client`], the session + gateway bundle |
//! | [`auth`] | startup restore, login, registration, logout |
//! | [`catalog`] | product listing with filters, detail, brands, categories |
//! | [`reviews`] | per-product review listing and submission |
//! | [`favorites`] | favorite flag per product and the favorites list |
//! | [`follow`] | public profiles, follow and unfollow |
//! | [`likes`] | like/dislike reactions on reviews |
//! | [`notifications`] | inbox, unread count, mark read |
//! | [`models`] | wire types |
//! | `mock` | scripted [`Transport`] for tests (`test-util` feature) |
//!
//! ## Backend calls exposed here
//!
//! - **Session**: `initialize`, `login`, `register`, `logout`, `me`
//! - **Catalog**: `list_products`, `product`, `brands`, `categories`
//! - **Reviews**: `product_reviews`, `submit_review`
//! - **Favorites**: `is_favorite`, `add_favorite`, `remove_favorite`, `set_favorite`, `favorites`
//! - **Likes**: `react`, `like_stats`
//! - **Profiles**: `user_profile`, `set_following`, `followers`, `following`
//! - **Notifications**: `notifications`, `unread_count`, `mark_notification_read`, `mark_all_notifications_read`

pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
pub mod favorites;
pub mod follow;
pub mod gateway;
pub mod likes;
pub mod models;
pub mod notifications;
pub mod reviews;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use catalog::{ProductQuery, SortOrder};
pub use client::Client;
pub use error::ApiError;
pub use gateway::{Access, Gateway, UnauthorizedHook};
pub use models::*;
pub use session::{AuthState, SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport};

pub use reqwest::Method;
pub use store::ClientConfig;
