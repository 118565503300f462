//! In-memory port fakes for the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use pressroom_common::{Category, EmailAddress, UserId};

use crate::domain::article::state::ArticleState;
use crate::domain::article::{Article, ArticleId, Engagement};
use crate::domain::clock::Clock;
use crate::domain::notification::{NotificationRequest, Notifier};
use crate::domain::repository::{
    ArticleRepository, RepositoryError, ScheduleRepository,
};
use crate::domain::scheduler::{ScheduleId, ScheduledPublication};

#[derive(Clone, Default)]
pub struct InMemoryArticles {
    inner: Arc<Mutex<HashMap<i64, Article>>>,
}

impl InMemoryArticles {
    pub fn insert(&self, article: Article) {
        self.inner.lock().unwrap().insert(article.id.0, article);
    }

    pub fn get(&self, id: ArticleId) -> Option<Article> {
        self.inner.lock().unwrap().get(&id.0).cloned()
    }

    pub fn set_state(&self, id: ArticleId, state: ArticleState) {
        self.inner
            .lock()
            .unwrap()
            .get_mut(&id.0)
            .expect("article must exist")
            .state = state;
    }
}

impl ArticleRepository for InMemoryArticles {
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn apply_transition(
        &self,
        id: ArticleId,
        new_state: ArticleState,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut articles = self.inner.lock().unwrap();
        let article = articles.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;

        article.state = new_state;
        // Mirrors the COALESCE guard of the Postgres adapter.
        if article.published_at.is_none() {
            article.published_at = published_at;
        }
        article.updated_at = published_at.unwrap_or(article.updated_at);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemorySchedules {
    inner: Arc<Mutex<Vec<ScheduledPublication>>>,
    next_id: Arc<Mutex<i64>>,
}

impl InMemorySchedules {
    pub fn rows_for(&self, article_id: ArticleId) -> Vec<ScheduledPublication> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.article_id == article_id)
            .cloned()
            .collect()
    }
}

impl ScheduleRepository for InMemorySchedules {
    async fn replace_for_article(
        &self,
        article_id: ArticleId,
        publish_at: DateTime<Utc>,
    ) -> Result<ScheduledPublication, RepositoryError> {
        let mut rows = self.inner.lock().unwrap();
        rows.retain(|row| row.article_id != article_id);

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let schedule = ScheduledPublication {
            id: ScheduleId(*next_id),
            article_id,
            publish_at,
            published: false,
        };
        rows.push(schedule.clone());
        Ok(schedule)
    }

    async fn due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledPublication>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|row| !row.published && row.publish_at <= now)
            .cloned()
            .collect())
    }

    async fn mark_published(&self, id: ScheduleId) -> Result<(), RepositoryError> {
        let mut rows = self.inner.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.published = true;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
    fail: bool,
}

impl RecordingNotifier {
    /// A notifier whose every send fails, for the fire-and-forget tests.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, request: NotificationRequest) -> Result<(), anyhow::Error> {
        if self.fail {
            return Err(anyhow!("mail gateway unreachable"));
        }
        self.sent.lock().unwrap().push(request);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

pub fn make_stored_article(
    articles: &InMemoryArticles,
    id: i64,
    author_id: i64,
    state: ArticleState,
    category: Category,
) -> Article {
    let created = Utc.with_ymd_and_hms(2024, 10, 6, 12, 0, 0).unwrap();
    let article = Article {
        id: ArticleId(id),
        title: format!("Article {}", id),
        description: String::new(),
        author_id: UserId(author_id),
        author_email: EmailAddress::try_new("author@example.com").unwrap(),
        category,
        state,
        published_at: None,
        engagement: Engagement::default(),
        created_at: created,
        updated_at: created,
    };
    articles.insert(article.clone());
    article
}
