use pressroom_common::Actor;

use crate::domain::article::error::StateChangeError;
use crate::domain::article::state::ArticleState;
use crate::domain::article::transitions::{self, TransitionOutcome};
use crate::domain::article::{Article, ArticleId};
use crate::domain::clock::Clock;
use crate::domain::notification::Notifier;
use crate::domain::repository::{ArticleRepository, RepositoryError};

/// The article state machine: loads, decides, persists, notifies.
///
/// The decision itself lives in [`transitions`] as pure functions; this
/// service owns the I/O around it. A rejected request leaves article,
/// timestamp and storage exactly as they were.
#[derive(Clone)]
pub struct PublicationService<A, N, C> {
    articles: A,
    notifier: N,
    clock: C,
}

impl<A, N, C> PublicationService<A, N, C>
where
    A: ArticleRepository,
    N: Notifier,
    C: Clock,
{
    pub fn new(articles: A, notifier: N, clock: C) -> Self {
        Self {
            articles,
            notifier,
            clock,
        }
    }

    pub async fn find_article(&self, id: ArticleId) -> Result<Option<Article>, RepositoryError> {
        self.articles.find_by_id(id).await
    }

    /// Run one permission-gated transition for an interactive actor.
    pub async fn change_state(
        &self,
        id: ArticleId,
        target: ArticleState,
        actor: &Actor,
    ) -> Result<Article, StateChangeError> {
        let article = self
            .articles
            .find_by_id(id)
            .await?
            .ok_or(StateChangeError::ArticleNotFound)?;

        let outcome = transitions::evaluate(&article, target, actor)?;
        self.apply(article, outcome).await
    }

    /// The sweep's publish path. Authorization already happened when the
    /// schedule row was created; state legality is still enforced.
    pub(crate) async fn publish_unchecked(
        &self,
        id: ArticleId,
    ) -> Result<Article, StateChangeError> {
        let article = self
            .articles
            .find_by_id(id)
            .await?
            .ok_or(StateChangeError::ArticleNotFound)?;

        let outcome = transitions::evaluate_trusted_publish(&article)?;
        self.apply(article, outcome).await
    }

    async fn apply(
        &self,
        article: Article,
        outcome: TransitionOutcome,
    ) -> Result<Article, StateChangeError> {
        let published_at = outcome.stamp_published_at.then(|| self.clock.now());

        self.articles
            .apply_transition(article.id, outcome.new_state, published_at)
            .await?;

        if let Some(request) = outcome.notification {
            // Best-effort: a mail failure must not roll back the state.
            if let Err(error) = self.notifier.send(request).await {
                tracing::warn!(
                    article_id = article.id.0,
                    "failed to notify author: {:#}",
                    error
                );
            }
        }

        let mut article = article;
        article.state = outcome.new_state;
        if article.published_at.is_none() {
            article.published_at = published_at;
        }
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pressroom_common::test_utils::{make_actor, make_admin, make_open_category};
    use pressroom_common::Permission;

    use super::*;
    use crate::domain::article::error::TransitionError;
    use crate::domain::test_support::{
        make_stored_article, FixedClock, InMemoryArticles, RecordingNotifier,
    };

    const AUTHOR: i64 = 1;

    fn service(
        articles: InMemoryArticles,
        notifier: RecordingNotifier,
    ) -> PublicationService<InMemoryArticles, RecordingNotifier, FixedClock> {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap());
        PublicationService::new(articles, notifier, clock)
    }

    #[tokio::test]
    async fn change_state_persists_and_notifies() {
        let articles = InMemoryArticles::default();
        let notifier = RecordingNotifier::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Draft, make_open_category(1));

        let service = service(articles.clone(), notifier.clone());
        let author = make_actor(AUTHOR, &[Permission::CreateArticles]);

        let updated = service
            .change_state(article.id, ArticleState::Revision, &author)
            .await
            .unwrap();

        assert_eq!(updated.state, ArticleState::Revision);
        assert_eq!(articles.get(article.id).unwrap().state, ArticleState::Revision);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html_body.contains("draft"));
        assert!(sent[0].html_body.contains("revision"));
    }

    #[tokio::test]
    async fn rejected_request_changes_nothing_and_sends_nothing() {
        let articles = InMemoryArticles::default();
        let notifier = RecordingNotifier::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Draft, make_open_category(1));

        let service = service(articles.clone(), notifier.clone());
        let stranger = make_actor(99, &[]);

        let result = service
            .change_state(article.id, ArticleState::Revision, &stranger)
            .await;

        assert!(matches!(
            result,
            Err(StateChangeError::Rejected(TransitionError::Forbidden))
        ));
        assert_eq!(articles.get(article.id).unwrap().state, ArticleState::Draft);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn first_publication_stamps_the_clock() {
        let articles = InMemoryArticles::default();
        let notifier = RecordingNotifier::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Edited, make_open_category(1));

        let service = service(articles.clone(), notifier.clone());
        let admin = make_admin(50);

        let updated = service
            .change_state(article.id, ArticleState::Published, &admin)
            .await
            .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap();
        assert!(updated.was_ever_published());
        assert_eq!(updated.published_at, Some(expected));
        assert_eq!(articles.get(article.id).unwrap().published_at, Some(expected));
    }

    #[tokio::test]
    async fn published_at_survives_round_trips() {
        let articles = InMemoryArticles::default();
        let notifier = RecordingNotifier::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Edited, make_open_category(1));

        let service = service(articles.clone(), notifier.clone());
        let admin = make_admin(50);

        service
            .change_state(article.id, ArticleState::Published, &admin)
            .await
            .unwrap();
        let first_stamp = articles.get(article.id).unwrap().published_at.unwrap();

        // Pull it back and publish again: the stamp must not move.
        service
            .change_state(article.id, ArticleState::Draft, &admin)
            .await
            .unwrap();
        service
            .change_state(article.id, ArticleState::Revision, &admin)
            .await
            .unwrap();
        service
            .change_state(article.id, ArticleState::Published, &admin)
            .await
            .unwrap();

        assert_eq!(articles.get(article.id).unwrap().published_at, Some(first_stamp));
    }

    #[tokio::test]
    async fn repeated_publish_request_fails_without_touching_the_stamp() {
        let articles = InMemoryArticles::default();
        let notifier = RecordingNotifier::default();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Edited, make_open_category(1));

        let service = service(articles.clone(), notifier.clone());
        let admin = make_admin(50);

        service
            .change_state(article.id, ArticleState::Published, &admin)
            .await
            .unwrap();
        let stamp = articles.get(article.id).unwrap().published_at;

        let second = service
            .change_state(article.id, ArticleState::Published, &admin)
            .await;

        assert!(matches!(
            second,
            Err(StateChangeError::Rejected(
                TransitionError::InvalidTransition { .. }
            ))
        ));
        assert_eq!(articles.get(article.id).unwrap().published_at, stamp);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_transition() {
        let articles = InMemoryArticles::default();
        let notifier = RecordingNotifier::failing();
        let article =
            make_stored_article(&articles, 10, AUTHOR, ArticleState::Draft, make_open_category(1));

        let service = service(articles.clone(), notifier);
        let author = make_actor(AUTHOR, &[Permission::CreateArticles]);

        let updated = service
            .change_state(article.id, ArticleState::Revision, &author)
            .await
            .unwrap();

        assert_eq!(updated.state, ArticleState::Revision);
    }

    #[tokio::test]
    async fn missing_article_is_reported_as_not_found() {
        let service = service(InMemoryArticles::default(), RecordingNotifier::default());
        let admin = make_admin(50);

        let result = service
            .change_state(ArticleId(404), ArticleState::Inactive, &admin)
            .await;

        assert!(matches!(result, Err(StateChangeError::ArticleNotFound)));
    }
}
