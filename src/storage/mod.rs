use anyhow::{Context, Result};
use sqlx::SqlitePool;

mod company_store;
mod invoice_store;

pub use company_store::*;
pub use invoice_store::*;

/// SQL migration for the initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Connect to a SQLite database at the given URL.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Run database migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(MIGRATION_001_INITIAL)
        .execute(pool)
        .await
        .context("Failed to run migration 001")?;
    Ok(())
}
