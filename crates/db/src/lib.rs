//! Persistence layer for the coupon claim service.
//!
//! - [`models`]: row structs and request DTOs.
//! - [`repositories`]: coupon and claim stores.
//! - [`engine`]: the transactional claim protocol.
//! - [`query`]: read-only projections.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod engine;
pub mod models;
pub mod query;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
