use chrono::{DateTime, Utc};
use pressroom_common::category::CategoryId;
use pressroom_common::database::Database;
use pressroom_common::{
    ARTICLES_TABLE, CATEGORIES_TABLE, USERS_TABLE, Category, CategoryKind, CategoryName,
    EmailAddress, UserId,
};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::domain::article::state::ArticleState;
use crate::domain::article::{Article, ArticleId, Engagement};
use crate::domain::repository::{ArticleRepository, RepositoryError};
use crate::infrastructure::persistence::database_error;

#[derive(Clone)]
pub struct PostgresArticleRepository {
    database: &'static Database,
}

impl PostgresArticleRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn select_sql(&self) -> String {
        let schema = self.database.database_schema();
        format!(
            "SELECT a.id, a.title, a.description, a.author_id, a.state, a.published_at, \
             a.views_number, a.shares_number, a.likes_number, a.dislikes_number, \
             a.created_at, a.updated_at, \
             u.email AS author_email, \
             c.id AS category_id, c.name AS category_name, \
             c.description AS category_description, c.kind AS category_kind, \
             c.active AS category_active, c.is_moderated AS category_is_moderated \
             FROM \"{schema}\".\"{ARTICLES_TABLE}\" a \
             JOIN \"{schema}\".\"{CATEGORIES_TABLE}\" c ON c.id = a.category_id \
             JOIN \"{schema}\".\"{USERS_TABLE}\" u ON u.id = a.author_id \
             WHERE a.id = $1"
        )
    }
}

impl ArticleRepository for PostgresArticleRepository {
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, RepositoryError> {
        let row = sqlx::query(&self.select_sql())
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn apply_transition(
        &self,
        id: ArticleId,
        new_state: ArticleState,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let schema = self.database.database_schema();
        // One statement: the state write and the stamp are atomic, and
        // COALESCE keeps an existing stamp from ever being overwritten.
        let sql = format!(
            "UPDATE \"{schema}\".\"{ARTICLES_TABLE}\" \
             SET state = $1, published_at = COALESCE(published_at, $2), updated_at = NOW() \
             WHERE id = $3"
        );

        let result = sqlx::query(&sql)
            .bind(new_state.code())
            .bind(published_at)
            .bind(id.0)
            .execute(self.database.database_pool())
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn row_to_article(row: &PgRow) -> Result<Article, RepositoryError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse id: {}", e)))?;

    let state_code: String = row
        .try_get("state")
        .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse state: {}", e)))?;
    let state = ArticleState::from_code(&state_code).ok_or_else(|| {
        RepositoryError::ValidationFailed(format!("unknown article state {:?}", state_code))
    })?;

    let author_email: String = row.try_get("author_email").map_err(|e| {
        RepositoryError::DatabaseError(format!("Failed to parse author_email: {}", e))
    })?;
    let author_email = EmailAddress::try_new(author_email).map_err(|e| {
        RepositoryError::ValidationFailed(format!("stored author email is invalid: {}", e))
    })?;

    let kind_code: String = row.try_get("category_kind").map_err(|e| {
        RepositoryError::DatabaseError(format!("Failed to parse category_kind: {}", e))
    })?;
    let kind = CategoryKind::from_code(&kind_code).ok_or_else(|| {
        RepositoryError::ValidationFailed(format!("unknown category kind {:?}", kind_code))
    })?;

    let category_name: String = row.try_get("category_name").map_err(|e| {
        RepositoryError::DatabaseError(format!("Failed to parse category_name: {}", e))
    })?;
    let category_name = CategoryName::try_new(category_name).map_err(|e| {
        RepositoryError::ValidationFailed(format!("stored category name is invalid: {}", e))
    })?;

    let category = Category {
        id: CategoryId(row.try_get("category_id").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse category_id: {}", e))
        })?),
        name: category_name,
        description: row.try_get("category_description").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse category_description: {}", e))
        })?,
        kind,
        active: row.try_get("category_active").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse category_active: {}", e))
        })?,
        is_moderated: row.try_get("category_is_moderated").map_err(|e| {
            RepositoryError::DatabaseError(format!(
                "Failed to parse category_is_moderated: {}",
                e
            ))
        })?,
    };

    let engagement = Engagement {
        views: row.try_get("views_number").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse views_number: {}", e))
        })?,
        shares: row.try_get("shares_number").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse shares_number: {}", e))
        })?,
        likes: row.try_get("likes_number").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse likes_number: {}", e))
        })?,
        dislikes: row.try_get("dislikes_number").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse dislikes_number: {}", e))
        })?,
    };

    Ok(Article {
        id: ArticleId(id),
        title: row
            .try_get("title")
            .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse title: {}", e)))?,
        description: row.try_get("description").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse description: {}", e))
        })?,
        author_id: UserId(row.try_get("author_id").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse author_id: {}", e))
        })?),
        author_email,
        category,
        state,
        published_at: row.try_get("published_at").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse published_at: {}", e))
        })?,
        engagement,
        created_at: row.try_get("created_at").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse created_at: {}", e))
        })?,
        updated_at: row.try_get("updated_at").map_err(|e| {
            RepositoryError::DatabaseError(format!("Failed to parse updated_at: {}", e))
        })?,
    })
}
