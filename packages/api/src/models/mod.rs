//! Wire models exchanged with the review backend.

mod auth;
mod common;
mod favorite;
mod follow;
mod like;
mod notification;
mod product;
mod review;
pub(crate) mod timestamp;
mod user;

pub use auth::{Credentials, RegisterRequest, TokenPair};
pub use common::Message;
pub(crate) use common::ErrorBody;
pub use favorite::{Favorite, FavoriteStatus};
pub use follow::{Follow, UserProfile};
pub use like::{LikeStats, Reaction};
pub use notification::{Notification, UnreadCount};
pub use product::{Category, Product};
pub use review::{NewReview, Review, ReviewSubmitted};
pub use user::UserInfo;
