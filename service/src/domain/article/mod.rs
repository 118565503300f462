pub mod error;
pub mod state;
pub mod transitions;

use chrono::{DateTime, Utc};
use pressroom_common::{Actor, Category, EmailAddress, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::article::state::ArticleState;

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArticleId(pub i64);

impl From<i64> for ArticleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One article row with its category snapshot joined in.
///
/// The category is read-only during a transition; only `state` and
/// `published_at` are written by the operations of this module, and
/// `published_at` is monotonic: stamped on the first arrival in
/// `Published`, never cleared or overwritten afterwards.
#[derive(Clone, Debug)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    pub author_id: UserId,
    /// Mailbox the transition notifications go to.
    pub author_email: EmailAddress,
    pub category: Category,
    pub state: ArticleState,
    pub published_at: Option<DateTime<Utc>>,
    pub engagement: Engagement,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reader counters co-located on the article row. Not touched by any
/// transition; they ride along for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub views: i64,
    pub shares: i64,
    pub likes: i64,
    pub dislikes: i64,
}

impl Article {
    pub fn is_authored_by(&self, actor: &Actor) -> bool {
        self.author_id == actor.user_id()
    }

    /// True once the article has reached Published at least once.
    pub fn was_ever_published(&self) -> bool {
        self.published_at.is_some()
    }
}
