use pressroom_common::database::Database;
use pressroom_common::{
    ADMINISTRATOR_ROLE, Actor, PERMISSIONS_TABLE, Permission, ROLE_PERMISSIONS_TABLE, ROLES_TABLE,
    USER_ROLES_TABLE, USERS_TABLE, UserId,
};

use crate::domain::repository::{AccessResolver, RepositoryError};
use crate::infrastructure::persistence::database_error;

/// Resolves a user into an [`Actor`] with two queries: the permission
/// union across the user's roles and the administrator membership. Done
/// once per request; the rules never go back to storage.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    database: &'static Database,
}

impl PostgresAccessRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl AccessResolver for PostgresAccessRepository {
    async fn resolve(&self, user_id: UserId) -> Result<Option<Actor>, RepositoryError> {
        let schema = self.database.database_schema();
        let pool = self.database.database_pool();

        let exists_sql = format!("SELECT id FROM \"{schema}\".\"{USERS_TABLE}\" WHERE id = $1");
        let known: Option<i64> = sqlx::query_scalar(&exists_sql)
            .bind(user_id.0)
            .fetch_optional(pool)
            .await
            .map_err(database_error)?;

        if known.is_none() {
            return Ok(None);
        }

        let permissions_sql = format!(
            "SELECT DISTINCT p.code \
             FROM \"{schema}\".\"{PERMISSIONS_TABLE}\" p \
             JOIN \"{schema}\".\"{ROLE_PERMISSIONS_TABLE}\" rp ON rp.permission_id = p.id \
             JOIN \"{schema}\".\"{USER_ROLES_TABLE}\" ur ON ur.role_id = rp.role_id \
             WHERE ur.user_id = $1"
        );
        let codes: Vec<String> = sqlx::query_scalar(&permissions_sql)
            .bind(user_id.0)
            .fetch_all(pool)
            .await
            .map_err(database_error)?;

        let permissions = codes.iter().filter_map(|code| {
            let permission = Permission::from_code(code);
            if permission.is_none() {
                tracing::warn!(user_id = user_id.0, code = %code, "ignoring unknown permission code");
            }
            permission
        });
        let permissions: Vec<Permission> = permissions.collect();

        let admin_sql = format!(
            "SELECT EXISTS (\
             SELECT 1 FROM \"{schema}\".\"{USER_ROLES_TABLE}\" ur \
             JOIN \"{schema}\".\"{ROLES_TABLE}\" r ON r.id = ur.role_id \
             WHERE ur.user_id = $1 AND r.name = $2)"
        );
        let is_admin: bool = sqlx::query_scalar(&admin_sql)
            .bind(user_id.0)
            .bind(ADMINISTRATOR_ROLE)
            .fetch_one(pool)
            .await
            .map_err(database_error)?;

        Ok(Some(Actor::new(user_id, permissions, is_admin)))
    }
}
