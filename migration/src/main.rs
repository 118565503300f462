use pressroom_common::database;

use crate::domain::migration::{apply_migration_steps, migration_steps};
use crate::domain::seed;
use crate::infrastructure::settings::Settings;
use crate::infrastructure::tables::TablesAdapter;

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let database = database::connect(&settings.database).await?;
    println!("Connected to DB");

    let tables = TablesAdapter::new(database);

    let steps = migration_steps(database.database_schema(), &tables).await?;
    apply_migration_steps(steps, database).await?;
    println!("Schema migrated");

    seed::apply(database).await?;
    println!("Catalogue seeded");

    Ok(())
}
