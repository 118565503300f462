use chrono::{DateTime, Utc};
use pressroom_common::SCHEDULED_PUBLICATIONS_TABLE;
use pressroom_common::database::Database;
use sqlx::Row;

use crate::domain::article::ArticleId;
use crate::domain::repository::{RepositoryError, ScheduleRepository};
use crate::domain::scheduler::{ScheduleId, ScheduledPublication};
use crate::infrastructure::persistence::database_error;

#[derive(Clone)]
pub struct PostgresScheduleRepository {
    database: &'static Database,
}

impl PostgresScheduleRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl ScheduleRepository for PostgresScheduleRepository {
    async fn replace_for_article(
        &self,
        article_id: ArticleId,
        publish_at: DateTime<Utc>,
    ) -> Result<ScheduledPublication, RepositoryError> {
        let schema = self.database.database_schema();

        // Delete-then-insert in one transaction so two competing
        // schedule requests cannot both leave a row behind. The partial
        // unique index on (article_id) WHERE NOT published backstops the
        // race; the loser surfaces as a unique violation.
        let mut transaction = self
            .database
            .database_pool()
            .begin()
            .await
            .map_err(database_error)?;

        let delete_sql = format!(
            "DELETE FROM \"{schema}\".\"{SCHEDULED_PUBLICATIONS_TABLE}\" WHERE article_id = $1"
        );
        sqlx::query(&delete_sql)
            .bind(article_id.0)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;

        let insert_sql = format!(
            "INSERT INTO \"{schema}\".\"{SCHEDULED_PUBLICATIONS_TABLE}\" \
             (article_id, publish_at, published) VALUES ($1, $2, FALSE) RETURNING id"
        );
        let row = sqlx::query(&insert_sql)
            .bind(article_id.0)
            .bind(publish_at)
            .fetch_one(&mut *transaction)
            .await
            .map_err(database_error)?;

        transaction.commit().await.map_err(database_error)?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse id: {}", e)))?;

        Ok(ScheduledPublication {
            id: ScheduleId(id),
            article_id,
            publish_at,
            published: false,
        })
    }

    async fn due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledPublication>, RepositoryError> {
        let schema = self.database.database_schema();
        let sql = format!(
            "SELECT id, article_id, publish_at, published \
             FROM \"{schema}\".\"{SCHEDULED_PUBLICATIONS_TABLE}\" \
             WHERE published = FALSE AND publish_at <= $1 \
             ORDER BY publish_at"
        );

        let rows = sqlx::query(&sql)
            .bind(now)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(database_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(ScheduledPublication {
                    id: ScheduleId(row.try_get("id").map_err(|e| {
                        RepositoryError::DatabaseError(format!("Failed to parse id: {}", e))
                    })?),
                    article_id: ArticleId(row.try_get("article_id").map_err(|e| {
                        RepositoryError::DatabaseError(format!("Failed to parse article_id: {}", e))
                    })?),
                    publish_at: row.try_get("publish_at").map_err(|e| {
                        RepositoryError::DatabaseError(format!("Failed to parse publish_at: {}", e))
                    })?,
                    published: row.try_get("published").map_err(|e| {
                        RepositoryError::DatabaseError(format!("Failed to parse published: {}", e))
                    })?,
                })
            })
            .collect()
    }

    async fn mark_published(&self, id: ScheduleId) -> Result<(), RepositoryError> {
        let schema = self.database.database_schema();
        let sql = format!(
            "UPDATE \"{schema}\".\"{SCHEDULED_PUBLICATIONS_TABLE}\" \
             SET published = TRUE WHERE id = $1"
        );

        let result = sqlx::query(&sql)
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
