use serde::{Deserialize, Serialize};

/// Aggregate reactions on one review plus the caller's own reaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStats {
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,
    /// `Some(true)` liked, `Some(false)` disliked, `None` no reaction.
    #[serde(default)]
    pub user_like_status: Option<bool>,
}

impl LikeStats {
    pub fn reaction(&self) -> Option<Reaction> {
        self.user_like_status.map(Reaction::from_is_like)
    }
}

/// A like or a dislike. Sending the caller's current reaction again clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn is_like(self) -> bool {
        matches!(self, Reaction::Like)
    }

    pub fn from_is_like(is_like: bool) -> Self {
        if is_like {
            Reaction::Like
        } else {
            Reaction::Dislike
        }
    }
}
