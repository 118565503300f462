use chrono::{DateTime, Utc};
use pressroom_common::{Actor, UserId};

use crate::domain::article::{Article, ArticleId, state::ArticleState};
use crate::domain::scheduler::{ScheduleId, ScheduledPublication};

/// Article storage port.
pub trait ArticleRepository: Clone + Send + Sync + 'static {
    /// Load one article with its category snapshot and author mailbox.
    fn find_by_id(
        &self,
        id: ArticleId,
    ) -> impl Future<Output = Result<Option<Article>, RepositoryError>> + Send;

    /// Persist a decided transition. The state write and the optional
    /// first-publication stamp must land as one atomic unit; an already
    /// present `published_at` is never overwritten.
    fn apply_transition(
        &self,
        id: ArticleId,
        new_state: ArticleState,
        published_at: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Deferred-publication storage port.
pub trait ScheduleRepository: Clone + Send + Sync + 'static {
    /// Delete whatever schedule rows exist for the article and insert a
    /// fresh unconsumed one, atomically with respect to competing
    /// `replace_for_article` calls for the same article.
    fn replace_for_article(
        &self,
        article_id: ArticleId,
        publish_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<ScheduledPublication, RepositoryError>> + Send;

    /// Unconsumed rows whose target time has passed.
    fn due(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<ScheduledPublication>, RepositoryError>> + Send;

    /// Flip the consumed flag. Rows are never deleted by the sweep; the
    /// flag is what keeps a row from being picked up again.
    fn mark_published(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Resolves a user into their full capability set, once per request.
pub trait AccessResolver: Clone + Send + Sync + 'static {
    fn resolve(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Actor>, RepositoryError>> + Send;
}

#[derive(Debug)]
pub enum RepositoryError {
    NotFound,
    ValidationFailed(String),
    UniqueViolation(String),
    DatabaseError(String),
}
