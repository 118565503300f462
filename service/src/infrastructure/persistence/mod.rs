pub mod access;
pub mod articles;
pub mod schedules;

pub use access::PostgresAccessRepository;
pub use articles::PostgresArticleRepository;
pub use schedules::PostgresScheduleRepository;

use crate::domain::repository::RepositoryError;

pub(crate) fn database_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::UniqueViolation(db.to_string())
        }
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        _ => RepositoryError::DatabaseError(error.to_string()),
    }
}
