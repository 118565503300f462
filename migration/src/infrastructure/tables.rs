use std::collections::HashSet;

use pressroom_common::database::Database;

use crate::domain::tables::Tables;

#[derive(Clone)]
pub struct TablesAdapter {
    database: &'static Database,
}

impl TablesAdapter {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl Tables for TablesAdapter {
    async fn load(&self) -> Result<HashSet<String>, anyhow::Error> {
        use futures::TryStreamExt;

        let sql = "SELECT table_name
            FROM information_schema.tables
            WHERE
              table_schema = $1
              AND table_type = 'BASE TABLE'";

        let mut rows = sqlx::query_scalar::<_, String>(sql)
            .bind(self.database.database_schema())
            .fetch(self.database.database_pool());

        let mut set = HashSet::new();

        while let Some(name) = rows.try_next().await? {
            set.insert(name);
        }

        Ok(set)
    }
}
