use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::article::state::ArticleState;
use crate::domain::article::{Article, Engagement};
use crate::domain::scheduler::ScheduledPublication;

#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub category: CategoryResponse,
    pub state: ArticleState,
    pub published_at: Option<DateTime<Utc>>,
    pub engagement: Engagement,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub is_moderated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub publish_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub article_id: i64,
    pub publish_at: DateTime<Utc>,
    pub published: bool,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.0,
            title: article.title,
            description: article.description,
            author_id: article.author_id.0,
            category: CategoryResponse {
                id: article.category.id.0,
                name: article.category.name.to_string(),
                kind: article.category.kind.code().to_string(),
                is_moderated: article.category.is_moderated,
            },
            state: article.state,
            published_at: article.published_at,
            engagement: article.engagement,
        }
    }
}

impl From<ScheduledPublication> for ScheduleResponse {
    fn from(schedule: ScheduledPublication) -> Self {
        Self {
            id: schedule.id.0,
            article_id: schedule.article_id.0,
            publish_at: schedule.publish_at,
            published: schedule.published,
        }
    }
}
