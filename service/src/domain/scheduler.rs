use chrono::{DateTime, Utc};
use pressroom_common::Actor;
use serde::{Deserialize, Serialize};

use crate::domain::article::error::ScheduleError;
use crate::domain::article::transitions;
use crate::domain::article::ArticleId;
use crate::domain::clock::Clock;
use crate::domain::notification::Notifier;
use crate::domain::publication::PublicationService;
use crate::domain::repository::{ArticleRepository, RepositoryError, ScheduleRepository};

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub i64);

impl From<i64> for ScheduleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A deferred publish request. At most one unconsumed row exists per
/// article; the sweep flips `published` instead of deleting, leaving an
/// audit trail of acted-on schedules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledPublication {
    pub id: ScheduleId,
    pub article_id: ArticleId,
    pub publish_at: DateTime<Utc>,
    pub published: bool,
}

/// Decouples "publish at time T" from the publish itself.
///
/// Registration checks the actor's publication eligibility once, up
/// front; the sweep later executes the backlog as a trusted system path
/// without re-asking.
#[derive(Clone)]
pub struct SchedulerService<A, S, N, C> {
    schedules: S,
    publications: PublicationService<A, N, C>,
}

impl<A, S, N, C> SchedulerService<A, S, N, C>
where
    A: ArticleRepository,
    S: ScheduleRepository,
    N: Notifier,
    C: Clock,
{
    pub fn new(schedules: S, publications: PublicationService<A, N, C>) -> Self {
        Self {
            schedules,
            publications,
        }
    }

    /// Register (or supersede) the article's deferred publication.
    pub async fn schedule(
        &self,
        article_id: ArticleId,
        publish_at: DateTime<Utc>,
        actor: &Actor,
    ) -> Result<ScheduledPublication, ScheduleError> {
        let article = self
            .publications
            .find_article(article_id)
            .await?
            .ok_or(ScheduleError::ArticleNotFound)?;

        if !transitions::may_eventually_publish(&article, actor) {
            return Err(ScheduleError::Forbidden);
        }

        let schedule = self
            .schedules
            .replace_for_article(article_id, publish_at)
            .await?;

        tracing::info!(
            article_id = article_id.0,
            publish_at = %publish_at,
            "publication scheduled"
        );
        Ok(schedule)
    }

    /// Promote every due, unconsumed schedule. Each row is processed in
    /// its own failure boundary: a rejected or failed promotion is
    /// logged, left unconsumed for a later attempt, and never aborts the
    /// batch. Returns the number of promotions.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let due = self.schedules.due(now).await?;
        if due.is_empty() {
            return Ok(0);
        }

        tracing::debug!(rows = due.len(), "processing due publications");

        let mut promoted = 0;
        for row in due {
            match self.publications.publish_unchecked(row.article_id).await {
                Ok(article) => {
                    if let Err(error) = self.schedules.mark_published(row.id).await {
                        tracing::error!(
                            schedule_id = row.id.0,
                            article_id = row.article_id.0,
                            "published but failed to consume schedule row: {:?}",
                            error
                        );
                        continue;
                    }
                    tracing::info!(
                        article_id = article.id.0,
                        "scheduled publication executed"
                    );
                    promoted += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        schedule_id = row.id.0,
                        article_id = row.article_id.0,
                        "skipping due publication: {:?}",
                        error
                    );
                }
            }
        }

        Ok(promoted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pressroom_common::test_utils::{
        make_actor, make_admin, make_moderated_category, make_open_category,
    };
    use pressroom_common::Permission;

    use super::*;
    use crate::domain::article::state::ArticleState;
    use crate::domain::test_support::{
        make_stored_article, FixedClock, InMemoryArticles, InMemorySchedules, RecordingNotifier,
    };

    const AUTHOR: i64 = 1;

    fn scheduler(
        articles: InMemoryArticles,
        schedules: InMemorySchedules,
    ) -> SchedulerService<InMemoryArticles, InMemorySchedules, RecordingNotifier, FixedClock> {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap());
        let publications =
            PublicationService::new(articles, RecordingNotifier::default(), clock);
        SchedulerService::new(schedules, publications)
    }

    #[tokio::test]
    async fn a_new_schedule_supersedes_the_old_one() {
        let articles = InMemoryArticles::default();
        let schedules = InMemorySchedules::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Draft, make_open_category(1));

        let scheduler = scheduler(articles, schedules.clone());
        let author = make_actor(AUTHOR, &[Permission::CreateArticles]);

        let t1 = Utc.with_ymd_and_hms(2024, 12, 24, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 12, 31, 9, 0, 0).unwrap();

        scheduler.schedule(article.id, t1, &author).await.unwrap();
        scheduler.schedule(article.id, t2, &author).await.unwrap();

        let rows = schedules.rows_for(article.id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].publish_at, t2);
        assert!(!rows[0].published);
    }

    #[tokio::test]
    async fn ineligible_actor_cannot_schedule() {
        let articles = InMemoryArticles::default();
        let schedules = InMemorySchedules::default();
        let article = make_stored_article(
            &articles,
            10,
            AUTHOR,
            ArticleState::Edited,
            make_moderated_category(1),
        );

        let scheduler = scheduler(articles, schedules.clone());
        // The author cannot publish into a moderated category, so they
        // cannot schedule one either.
        let author = make_actor(AUTHOR, &[Permission::CreateArticles]);

        let when = Utc.with_ymd_and_hms(2024, 12, 24, 9, 0, 0).unwrap();
        let result = scheduler.schedule(article.id, when, &author).await;

        assert!(matches!(result, Err(ScheduleError::Forbidden)));
        assert!(schedules.rows_for(article.id).is_empty());
    }

    #[tokio::test]
    async fn sweep_promotes_due_rows_and_consumes_them_once() {
        let articles = InMemoryArticles::default();
        let schedules = InMemorySchedules::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Edited, make_open_category(1));

        let scheduler = scheduler(articles.clone(), schedules.clone());
        let admin = make_admin(50);

        let when = Utc.with_ymd_and_hms(2024, 12, 24, 9, 0, 0).unwrap();
        scheduler.schedule(article.id, when, &admin).await.unwrap();

        let before = Utc.with_ymd_and_hms(2024, 12, 24, 8, 0, 0).unwrap();
        assert_eq!(scheduler.run_sweep(before).await.unwrap(), 0);
        assert_eq!(articles.get(article.id).unwrap().state, ArticleState::Edited);

        let after = Utc.with_ymd_and_hms(2024, 12, 24, 9, 30, 0).unwrap();
        assert_eq!(scheduler.run_sweep(after).await.unwrap(), 1);
        assert_eq!(
            articles.get(article.id).unwrap().state,
            ArticleState::Published
        );

        let rows = schedules.rows_for(article.id);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].published);

        // A second pass finds nothing: the consumed row is filtered out
        // even though its target time is still in the past.
        assert_eq!(scheduler.run_sweep(after).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn one_bad_row_does_not_abort_the_batch() {
        let articles = InMemoryArticles::default();
        let schedules = InMemorySchedules::default();

        let withdrawn = make_stored_article(
            &articles,
            10,
            AUTHOR,
            ArticleState::Edited,
            make_open_category(1),
        );
        let healthy = make_stored_article(
            &articles,
            11,
            AUTHOR,
            ArticleState::Edited,
            make_open_category(1),
        );

        let scheduler = scheduler(articles.clone(), schedules.clone());
        let admin = make_admin(50);

        let when = Utc.with_ymd_and_hms(2024, 12, 24, 9, 0, 0).unwrap();
        scheduler.schedule(withdrawn.id, when, &admin).await.unwrap();
        scheduler.schedule(healthy.id, when, &admin).await.unwrap();

        // The first article is withdrawn between scheduling and sweep.
        articles.set_state(withdrawn.id, ArticleState::Inactive);

        let after = Utc.with_ymd_and_hms(2024, 12, 24, 10, 0, 0).unwrap();
        assert_eq!(scheduler.run_sweep(after).await.unwrap(), 1);

        assert_eq!(
            articles.get(healthy.id).unwrap().state,
            ArticleState::Published
        );
        assert_eq!(
            articles.get(withdrawn.id).unwrap().state,
            ArticleState::Inactive
        );

        // The failed row stays unconsumed for a later attempt.
        assert!(!schedules.rows_for(withdrawn.id)[0].published);
        assert!(schedules.rows_for(healthy.id)[0].published);
    }

    #[tokio::test]
    async fn sweep_stamps_publication_time_once() {
        let articles = InMemoryArticles::default();
        let schedules = InMemorySchedules::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Edited, make_open_category(1));

        let scheduler = scheduler(articles.clone(), schedules.clone());
        let admin = make_admin(50);

        let when = Utc.with_ymd_and_hms(2024, 12, 24, 9, 0, 0).unwrap();
        scheduler.schedule(article.id, when, &admin).await.unwrap();

        let after = Utc.with_ymd_and_hms(2024, 12, 24, 10, 0, 0).unwrap();
        scheduler.run_sweep(after).await.unwrap();

        let stored = articles.get(article.id).unwrap();
        assert!(stored.published_at.is_some());
    }
}
