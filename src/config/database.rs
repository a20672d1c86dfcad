//! Database configuration module for the asset ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    Account, Asset, AssetProfile, DepreciationLine, EntryLine, EntryMessage, JournalEntry,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/asset_ledger.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet, in foreign-key order.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, AssetProfile).await?;
    create_table(db, Account).await?;
    create_table(db, JournalEntry).await?;
    create_table(db, Asset).await?;
    create_table(db, EntryLine).await?;
    create_table(db, DepreciationLine).await?;
    create_table(db, EntryMessage).await?;
    info!("Database tables ensured");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountModel, AssetModel, DepreciationLineModel, JournalEntryModel};
    use sea_orm::{QuerySelect, prelude::*};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<JournalEntryModel> = JournalEntry::find().limit(1).all(&db).await?;
        let _: Vec<AssetModel> = Asset::find().limit(1).all(&db).await?;
        let _: Vec<DepreciationLineModel> = DepreciationLine::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        assert_eq!(EntryLine::find().count(&db).await?, 0);
        Ok(())
    }
}
