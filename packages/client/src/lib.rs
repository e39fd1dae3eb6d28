//! # Headless controllers for Yorumator frontends
//!
//! Each controller owns the state behind one control or screen and drives the
//! backend through a shared [`api::Client`]. Frontends render from the getters
//! and call the async actions; no rendering happens here.
//!
//! | Controller | Backs |
//! |------------|-------|
//! | [`Account`] | sign-in, sign-up, sign-out |
//! | [`Catalog`] | product list with filters and paging |
//! | [`ReviewThread`] | product page: header, reviews, optimistic "write a review" |
//! | [`FavoriteToggle`] | optimistic favorite heart |
//! | [`FavoritesShelf`] | favorites screen |
//! | [`LikeBoard`] | like/dislike counts under reviews |
//! | [`ProfileCard`] | another user's profile and optimistic follow button |
//! | [`NotificationInbox`] | notifications screen and unread badge |
//!
//! Every action reports failure as an [`ActionError`] and, where a user would
//! see a message, pushes it to the controller's [`Notices`]. Screen-level
//! fetches run inside a [`ScopeHandle`]; see [`lifecycle`].

pub mod auth;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod lifecycle;
pub mod likes;
pub mod notice;
pub mod notifications;
pub mod optimistic;
pub mod profile;
pub mod reviews;

#[cfg(test)]
mod testing;

pub use auth::{validate_sign_in, validate_sign_up, Account, MIN_PASSWORD_LEN};
pub use catalog::Catalog;
pub use error::ActionError;
pub use favorites::{FavoriteToggle, FavoritesShelf};
pub use lifecycle::{BusyFlag, Scope, ScopeHandle};
pub use likes::LikeBoard;
pub use notice::{Notice, NoticeLevel, Notices};
pub use notifications::NotificationInbox;
pub use optimistic::{Keyed, OptimisticFlag, OptimisticList, TentativeId};
pub use profile::ProfileCard;
pub use reviews::{ReviewThread, PLACEHOLDER_AUTHOR};
